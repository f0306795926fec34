use crate::error::{ProcessingError, Result};
use crate::models::DailyObservation;
use crate::readers::record_parser::{parse_day, validate_line};
use crate::utils::constants::{DAYS_PER_LINE, DEFAULT_BUFFER_SIZE};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

pub struct DlyReader {
    buffer_size: usize,
}

impl DlyReader {
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self { buffer_size }
    }

    /// Stream the daily observations of a `.dly` file, one line at a time
    pub fn stream_observations(&self, path: &Path) -> Result<ObservationIterator> {
        let file = File::open(path).map_err(|e| ProcessingError::file_io(path, e))?;
        let reader = BufReader::with_capacity(self.buffer_size, file);

        Ok(ObservationIterator {
            path: path.to_path_buf(),
            lines: reader.lines(),
            current_line: None,
            next_day: 1,
            line_number: 0,
            finished: false,
        })
    }
}

impl Default for DlyReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Yields the 31 observations of each line in day order before reading the
/// next line.
///
/// A line that cannot be unpacked yields a single `MalformedLine` error and
/// none of its rows; iteration then resumes with the following line. A read
/// error yields `FileIo` and ends the stream.
pub struct ObservationIterator {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    current_line: Option<String>,
    next_day: usize,
    line_number: usize,
    finished: bool,
}

impl ObservationIterator {
    /// Number of lines read so far, malformed ones included
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    fn malformed(&self, source: crate::error::RecordError) -> ProcessingError {
        ProcessingError::MalformedLine {
            path: self.path.clone(),
            line_number: self.line_number,
            source,
        }
    }
}

impl Iterator for ObservationIterator {
    type Item = Result<DailyObservation>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if let Some(line) = &self.current_line {
                if self.next_day <= DAYS_PER_LINE {
                    let day = self.next_day;
                    self.next_day += 1;
                    return Some(parse_day(line, day).map_err(|e| self.malformed(e)));
                }
                self.current_line = None;
            }

            match self.lines.next() {
                None => {
                    self.finished = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(ProcessingError::file_io(&self.path, e)));
                }
                Some(Ok(line)) => {
                    self.line_number += 1;
                    if let Err(e) = validate_line(&line) {
                        return Some(Err(self.malformed(e)));
                    }
                    self.current_line = Some(line);
                    self.next_day = 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;
    use crate::readers::record_parser::tests::station_line;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_single_line_yields_31_days_in_order() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(
            temp_file,
            "{}",
            station_line("USW00094728", "1950", "01", "TMAX", "  100   ")
        )?;

        let reader = DlyReader::new();
        let observations: Vec<DailyObservation> = reader
            .stream_observations(temp_file.path())?
            .collect::<Result<_>>()?;

        assert_eq!(observations.len(), 31);
        for (index, observation) in observations.iter().enumerate() {
            assert_eq!(observation.date, format!("1950-01-{:02}", index + 1));
        }
        assert_eq!(observations[0].value, "  100");
        assert!(observations[1..].iter().all(|o| o.is_missing()));

        Ok(())
    }

    #[test]
    fn test_lines_keep_source_order() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", station_line("USW00094728", "1950", "01", "TMAX", "  100   "))?;
        writeln!(temp_file, "{}", station_line("USW00094728", "1950", "01", "TMIN", "  -17   "))?;

        let mut iterator = DlyReader::new().stream_observations(temp_file.path())?;
        let elements: Vec<String> = iterator
            .by_ref()
            .map(|o| o.map(|o| o.element))
            .collect::<Result<_>>()?;

        assert_eq!(elements.len(), 62);
        assert!(elements[..31].iter().all(|e| e == "TMAX"));
        assert!(elements[31..].iter().all(|e| e == "TMIN"));
        assert_eq!(iterator.lines_read(), 2);

        Ok(())
    }

    #[test]
    fn test_short_line_reported_and_skipped_over() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", station_line("USW00094728", "1950", "01", "TMAX", "  100   "))?;
        writeln!(temp_file, "USW00094728195002TMAX  100   ")?;
        writeln!(temp_file, "{}", station_line("USW00094728", "1950", "03", "TMAX", "  120   "))?;

        let items: Vec<Result<DailyObservation>> = DlyReader::new()
            .stream_observations(temp_file.path())?
            .collect();

        assert_eq!(items.len(), 63);
        assert!(items[..31].iter().all(|i| i.is_ok()));
        match &items[31] {
            Err(ProcessingError::MalformedLine {
                line_number,
                source,
                ..
            }) => {
                assert_eq!(*line_number, 2);
                assert_eq!(
                    *source,
                    RecordError::LineTooShort {
                        required: 269,
                        actual: 29
                    }
                );
            }
            other => panic!("expected malformed line, got {:?}", other),
        }
        assert_eq!(
            items[32].as_ref().map(|o| o.date.clone()).ok(),
            Some("1950-03-01".to_string())
        );

        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = DlyReader::new().stream_observations(Path::new("/nonexistent/station.dly"));
        assert!(matches!(result, Err(ProcessingError::FileIo { .. })));
    }

    #[test]
    fn test_invalid_utf8_ends_stream() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(&[0xff, 0xfe, b'\n'])?;

        let items: Vec<Result<DailyObservation>> = DlyReader::new()
            .stream_observations(temp_file.path())?
            .collect();

        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(ProcessingError::FileIo { .. })));

        Ok(())
    }
}
