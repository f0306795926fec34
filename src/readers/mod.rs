pub mod dly_reader;
pub mod record_parser;

pub use dly_reader::{DlyReader, ObservationIterator};
pub use record_parser::{parse_day, validate_line};
