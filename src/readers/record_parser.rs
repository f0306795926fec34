use crate::error::RecordError;
use crate::models::DailyObservation;
use crate::utils::constants::{
    DAYS_PER_LINE, DAY_BLOCKS_OFFSET, DAY_BLOCK_WIDTH, ELEMENT_RANGE, MFLAG_OFFSET,
    MISSING_VALUE_LABEL, MISSING_VALUE_SENTINEL, MONTH_RANGE, QFLAG_OFFSET, RECORD_MIN_LENGTH,
    SFLAG_OFFSET, STATION_ID_RANGE, VALUE_WIDTH, YEAR_RANGE,
};
use std::ops::Range;

/// Byte offset of the block holding `day` (1-based)
pub fn day_block_offset(day: usize) -> usize {
    DAY_BLOCKS_OFFSET + (day - 1) * DAY_BLOCK_WIDTH
}

/// Minimum line length needed to read `day`
pub fn required_length(day: usize) -> usize {
    DAY_BLOCKS_OFFSET + day * DAY_BLOCK_WIDTH
}

/// Check that a whole line can be unpacked into all 31 days.
///
/// Only the fixed-width part is required to be ASCII; anything after the
/// last day block is ignored.
pub fn validate_line(line: &str) -> Result<(), RecordError> {
    if line.len() < RECORD_MIN_LENGTH {
        return Err(RecordError::LineTooShort {
            required: RECORD_MIN_LENGTH,
            actual: line.len(),
        });
    }

    if !line.as_bytes()[..RECORD_MIN_LENGTH].is_ascii() {
        return Err(RecordError::NonAscii);
    }

    Ok(())
}

/// Unpack the observation for `day` from a raw `.dly` line.
///
/// The value is passed through untouched unless it is exactly `-9999`, in
/// which case it becomes `None`. Flags are copied as single characters,
/// spaces included.
///
/// # Examples
/// ```
/// use ghcnd_processor::readers::parse_day;
///
/// let mut line = String::from("USW000947281950");
/// line.push_str("01TMAX");
/// line.push_str(&"  100   ".repeat(31));
///
/// let observation = parse_day(&line, 7).unwrap();
/// assert_eq!(observation.date, "1950-01-07");
/// assert_eq!(observation.value, "  100");
/// ```
pub fn parse_day(line: &str, day: usize) -> Result<DailyObservation, RecordError> {
    if !(1..=DAYS_PER_LINE).contains(&day) {
        return Err(RecordError::DayOutOfRange { day });
    }

    let required = required_length(day);
    if line.len() < required {
        return Err(RecordError::LineTooShort {
            required,
            actual: line.len(),
        });
    }

    let block = day_block_offset(day);
    let year = field(line, YEAR_RANGE)?;
    let month = field(line, MONTH_RANGE)?;

    let raw_value = field(line, block..block + VALUE_WIDTH)?;
    let value = if raw_value == MISSING_VALUE_SENTINEL {
        MISSING_VALUE_LABEL
    } else {
        raw_value
    };

    Ok(DailyObservation {
        station_id: field(line, STATION_ID_RANGE)?.to_string(),
        date: format!("{}-{}-{:02}", year, month, day),
        element: field(line, ELEMENT_RANGE)?.to_string(),
        value: value.to_string(),
        mflag: flag(line, block + MFLAG_OFFSET)?,
        qflag: flag(line, block + QFLAG_OFFSET)?,
        sflag: flag(line, block + SFLAG_OFFSET)?,
    })
}

fn field(line: &str, range: Range<usize>) -> Result<&str, RecordError> {
    line.get(range).ok_or(RecordError::NonAscii)
}

fn flag(line: &str, offset: usize) -> Result<char, RecordError> {
    match line.as_bytes().get(offset) {
        Some(byte) if byte.is_ascii() => Ok(char::from(*byte)),
        _ => Err(RecordError::NonAscii),
    }
}
