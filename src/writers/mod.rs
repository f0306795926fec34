pub mod csv_writer;
pub mod spool;

pub use csv_writer::{write_header, write_preamble, CsvOutputWriter, ObservationWriter};
pub use spool::{Spool, SpoolDirectory, SpoolWriter};
