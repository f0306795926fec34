use crate::config::MalformedLinePolicy;
use crate::error::{ProcessingError, Result};
use crate::processors::FileStats;
use crate::readers::DlyReader;
use crate::writers::{Spool, SpoolDirectory};
use std::path::Path;
use tracing::{debug, warn};

/// Unpacks one `.dly` file into its own spool.
pub struct FileProcessor {
    reader: DlyReader,
    policy: MalformedLinePolicy,
}

impl FileProcessor {
    pub fn new(policy: MalformedLinePolicy) -> Self {
        Self {
            reader: DlyReader::new(),
            policy,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.reader = DlyReader::with_buffer_size(buffer_size);
        self
    }

    /// Stream every row of `path` into a new spool in `spools`.
    ///
    /// Under `Abort` the first malformed line fails the file and the partial
    /// spool is discarded along with the error.
    pub fn spool(&self, path: &Path, spools: &SpoolDirectory) -> Result<Spool> {
        let mut observations = self.reader.stream_observations(path)?;
        let mut writer = spools.create_writer(path)?;
        let mut stats = FileStats::default();

        for item in observations.by_ref() {
            match item {
                Ok(observation) => {
                    if observation.calendar_date().is_none() {
                        stats.rows_without_calendar_date += 1;
                    }
                    writer.write(&observation)?;
                    stats.rows_written += 1;
                }
                Err(e @ ProcessingError::MalformedLine { .. })
                    if self.policy == MalformedLinePolicy::Skip =>
                {
                    warn!("Skipping {}", e);
                    stats.lines_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        stats.lines_read = observations.lines_read();
        debug!(
            "Spooled {} rows from {} lines of {}",
            stats.rows_written,
            stats.lines_read,
            path.display()
        );

        writer.finish(stats)
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new(MalformedLinePolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::record_parser::tests::station_line;
    use std::fs;
    use tempfile::TempDir;

    fn write_station_file(dir: &Path, lines: &[String]) -> std::path::PathBuf {
        let path = dir.join("USC00045721.dly");
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_spool_counts_rows_and_calendar_gaps() -> Result<()> {
        let input_dir = TempDir::new()?;
        let output_dir = TempDir::new()?;
        let path = write_station_file(
            input_dir.path(),
            &[
                station_line("USC00045721", "2001", "01", "PRCP", "    0   "),
                station_line("USC00045721", "2001", "02", "PRCP", "   13   "),
            ],
        );

        let spools = SpoolDirectory::beside(&output_dir.path().join("merged_data.csv"))?;
        let spool = FileProcessor::default().spool(&path, &spools)?;

        assert_eq!(spool.stats.lines_read, 2);
        assert_eq!(spool.stats.rows_written, 62);
        assert_eq!(spool.stats.lines_skipped, 0);
        // February 29, 30, 31 in a non-leap year
        assert_eq!(spool.stats.rows_without_calendar_date, 3);

        let rows = fs::read_to_string(spool.rows_path())?;
        assert_eq!(rows.lines().count(), 62);
        assert!(rows.lines().all(|row| row.split(',').count() == 7));
        Ok(())
    }

    #[test]
    fn test_skip_policy_drops_only_the_bad_line() -> Result<()> {
        let input_dir = TempDir::new()?;
        let output_dir = TempDir::new()?;
        let path = write_station_file(
            input_dir.path(),
            &[
                station_line("USC00045721", "2001", "01", "PRCP", "    0   "),
                "USC00045721200102PRCP".to_string(),
                station_line("USC00045721", "2001", "03", "PRCP", "    5   "),
            ],
        );

        let spools = SpoolDirectory::beside(&output_dir.path().join("merged_data.csv"))?;
        let spool = FileProcessor::new(MalformedLinePolicy::Skip).spool(&path, &spools)?;

        assert_eq!(spool.stats.lines_read, 3);
        assert_eq!(spool.stats.lines_skipped, 1);
        assert_eq!(spool.stats.rows_written, 62);
        Ok(())
    }

    #[test]
    fn test_abort_policy_fails_the_file() -> Result<()> {
        let input_dir = TempDir::new()?;
        let output_dir = TempDir::new()?;
        let path = write_station_file(
            input_dir.path(),
            &[
                station_line("USC00045721", "2001", "01", "PRCP", "    0   "),
                "USC00045721200102PRCP".to_string(),
            ],
        );

        let spools = SpoolDirectory::beside(&output_dir.path().join("merged_data.csv"))?;
        let result = FileProcessor::new(MalformedLinePolicy::Abort).spool(&path, &spools);

        match result {
            Err(ProcessingError::MalformedLine { line_number, .. }) => assert_eq!(line_number, 2),
            other => panic!("expected malformed line error, got {:?}", other),
        }
        Ok(())
    }
}
