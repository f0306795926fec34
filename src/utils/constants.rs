use std::ops::Range;

/// Fixed-width field positions of a `.dly` station line
pub const STATION_ID_RANGE: Range<usize> = 0..11;
pub const YEAR_RANGE: Range<usize> = 11..15;
pub const MONTH_RANGE: Range<usize> = 15..17;
pub const ELEMENT_RANGE: Range<usize> = 17..21;

/// Day blocks: value(5) + mflag(1) + qflag(1) + sflag(1)
pub const DAY_BLOCKS_OFFSET: usize = 21;
pub const DAY_BLOCK_WIDTH: usize = 8;
pub const VALUE_WIDTH: usize = 5;
pub const MFLAG_OFFSET: usize = 5;
pub const QFLAG_OFFSET: usize = 6;
pub const SFLAG_OFFSET: usize = 7;
pub const DAYS_PER_LINE: usize = 31;

/// Shortest line that holds all 31 day blocks
pub const RECORD_MIN_LENGTH: usize = DAY_BLOCKS_OFFSET + DAYS_PER_LINE * DAY_BLOCK_WIDTH;

/// Missing observations
pub const MISSING_VALUE_SENTINEL: &str = "-9999";
pub const MISSING_VALUE_LABEL: &str = "None";

/// Output layout
pub const COLUMN_NAMES: [&str; 7] = ["ID", "Date", "Element", "Value", "MFlag", "QFlag", "SFlag"];
pub const HEADER_COMMENTS: [&str; 8] = [
    "ID: Station identification code.",
    "Date: Date of observation in YYYY-MM-DD format.",
    "Element: Type of observation (e.g., PRCP for Precipitation).",
    "Value: Observation value (e.g., temperature in tenths of degrees C, 'None' if missing).",
    "MFlag: Measurement flag.",
    "QFlag: Quality flag.",
    "SFlag: Source flag.",
    "Refer to the GHCN Daily Readme for detailed descriptions: https://www.ncei.noaa.gov/pub/data/ghcn/daily/readme.txt",
];

/// File names
pub const DEFAULT_INPUT_EXTENSION: &str = "dly";
pub const DEFAULT_OUTPUT_FILE: &str = "merged_data.csv";
pub const SPOOL_DIR_PREFIX: &str = ".ghcnd-spool-";

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const SPOOLS_IN_FLIGHT_PER_WORKER: usize = 2;
