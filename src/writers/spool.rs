use crate::error::{ProcessingError, Result};
use crate::models::DailyObservation;
use crate::processors::FileStats;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, SPOOL_DIR_PREFIX};
use crate::writers::ObservationWriter;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir, TempPath};

/// Scratch directory holding one spool file per input file.
///
/// Created next to the output so the final append never crosses
/// filesystems. Removed with everything in it when dropped.
pub struct SpoolDirectory {
    temp_dir: TempDir,
}

impl SpoolDirectory {
    pub fn beside(output_path: &Path) -> Result<Self> {
        let parent = output_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let temp_dir = tempfile::Builder::new()
            .prefix(SPOOL_DIR_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| ProcessingError::output_write(output_path, e))?;

        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Open a fresh spool for the rows of `source`.
    ///
    /// Spool failures are output-side failures and surface as `OutputWrite`.
    pub fn create_writer(&self, source: &Path) -> Result<SpoolWriter> {
        let file = NamedTempFile::new_in(self.temp_dir.path())
            .map_err(|e| ProcessingError::output_write(self.temp_dir.path(), e))?;

        Ok(SpoolWriter {
            source: source.to_path_buf(),
            spool_path: file.path().to_path_buf(),
            writer: ObservationWriter::new(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file)),
        })
    }
}

pub struct SpoolWriter {
    source: PathBuf,
    spool_path: PathBuf,
    writer: ObservationWriter<BufWriter<NamedTempFile>>,
}

impl SpoolWriter {
    pub fn write(&mut self, observation: &DailyObservation) -> Result<()> {
        self.writer.write(observation).map_err(|e| match e {
            ProcessingError::Csv(csv_error) => {
                ProcessingError::output_write(&self.spool_path, std::io::Error::from(csv_error))
            }
            other => other,
        })
    }

    /// Flush and close the spool, keeping the file until the returned `Spool` drops
    pub fn finish(self, stats: FileStats) -> Result<Spool> {
        let spool_path = self.spool_path;
        let buffered = self
            .writer
            .into_inner()
            .map_err(|e| ProcessingError::output_write(&spool_path, e))?;
        let file = buffered
            .into_inner()
            .map_err(|e| ProcessingError::output_write(&spool_path, e.into_error()))?;
        let source = self.source;

        Ok(Spool {
            source,
            stats,
            rows: file.into_temp_path(),
        })
    }
}

/// The complete, flushed rows of one input file.
#[derive(Debug)]
pub struct Spool {
    pub source: PathBuf,
    pub stats: FileStats,
    rows: TempPath,
}

impl Spool {
    pub fn rows_path(&self) -> &Path {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spool_lifecycle() -> Result<()> {
        let output_dir = TempDir::new()?;
        let output_path = output_dir.path().join("merged_data.csv");
        let spools = SpoolDirectory::beside(&output_path)?;
        assert!(spools.path().starts_with(output_dir.path()));

        let mut writer = spools.create_writer(Path::new("USW00094728.dly"))?;
        writer.write(&DailyObservation {
            station_id: "USW00094728".to_string(),
            date: "1950-01-01".to_string(),
            element: "TMAX".to_string(),
            value: "  100".to_string(),
            mflag: ' ',
            qflag: ' ',
            sflag: ' ',
        })?;
        let spool = writer.finish(FileStats::default())?;

        let rows_path = spool.rows_path().to_path_buf();
        assert_eq!(
            std::fs::read_to_string(&rows_path)?,
            "USW00094728,1950-01-01,TMAX,  100, , , \n"
        );
        assert_eq!(spool.source, PathBuf::from("USW00094728.dly"));

        drop(spool);
        assert!(!rows_path.exists());
        Ok(())
    }

    #[test]
    fn test_spool_failure_is_an_output_error() -> Result<()> {
        let output_dir = TempDir::new()?;
        let output_path = output_dir.path().join("merged_data.csv");
        let spools = SpoolDirectory::beside(&output_path)?;
        let spool_dir = spools.path().to_path_buf();

        std::fs::remove_dir(&spool_dir)?;
        let result = spools.create_writer(Path::new("USW00094728.dly"));

        match result {
            Err(ProcessingError::OutputWrite { path, .. }) => assert_eq!(path, spool_dir),
            Err(other) => panic!("expected output write error, got {:?}", other),
            Ok(_) => panic!("expected output write error"),
        }
        Ok(())
    }
}
