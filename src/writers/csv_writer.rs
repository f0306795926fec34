use crate::error::{ProcessingError, Result};
use crate::models::DailyObservation;
use crate::utils::constants::{COLUMN_NAMES, DEFAULT_BUFFER_SIZE, HEADER_COMMENTS};
use crate::writers::Spool;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write the `#` comment block and the column header line.
pub fn write_preamble<W: Write>(writer: &mut W) -> io::Result<()> {
    for comment in HEADER_COMMENTS {
        writeln!(writer, "# {}", comment)?;
    }
    write_header(writer)
}

pub fn write_header<W: Write>(writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{}", COLUMN_NAMES.join(","))
}

/// Formats observations as comma-separated rows.
///
/// Fields are written exactly as parsed: no quoting, no trimming, so a blank
/// flag stays a single space between two commas.
pub struct ObservationWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ObservationWriter<W> {
    pub fn new(inner: W) -> Self {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(inner);

        Self { writer }
    }

    pub fn write(&mut self, observation: &DailyObservation) -> Result<()> {
        self.writer.serialize(observation)?;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

/// Sole owner of the merged output file.
pub struct CsvOutputWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    bytes_appended: u64,
}

impl CsvOutputWriter {
    /// Create (or truncate) the output file and write the preamble
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ProcessingError::output_write(path, e))?;
        }

        let file = File::create(path).map_err(|e| ProcessingError::output_write(path, e))?;
        let mut writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        write_preamble(&mut writer).map_err(|e| ProcessingError::output_write(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            bytes_appended: 0,
        })
    }

    pub fn bytes_appended(&self) -> u64 {
        self.bytes_appended
    }

    /// Copy a finished spool to the end of the output
    pub fn append_spool(&mut self, spool: &Spool) -> Result<u64> {
        let mut rows = File::open(spool.rows_path())
            .map_err(|e| ProcessingError::output_write(&self.path, e))?;
        let copied = io::copy(&mut rows, &mut self.writer)
            .map_err(|e| ProcessingError::output_write(&self.path, e))?;

        self.bytes_appended += copied;
        Ok(copied)
    }

    /// Flush everything to disk and close the file
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer
            .flush()
            .map_err(|e| ProcessingError::output_write(&self.path, e))?;
        self.writer
            .get_ref()
            .sync_all()
            .map_err(|e| ProcessingError::output_write(&self.path, e))?;
        Ok(self.path)
    }
}
