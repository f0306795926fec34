use crate::utils::constants::MISSING_VALUE_LABEL;
use chrono::NaiveDate;
use serde::Serialize;

/// One day unpacked from a `.dly` station line.
///
/// Every field is carried as the text found in the source line. `date` is
/// synthesized from the raw year and month plus the day index, so days 29-31
/// are present for every month even when the calendar has no such day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyObservation {
    #[serde(rename = "ID")]
    pub station_id: String,

    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Element")]
    pub element: String,

    #[serde(rename = "Value")]
    pub value: String,

    #[serde(rename = "MFlag")]
    pub mflag: char,

    #[serde(rename = "QFlag")]
    pub qflag: char,

    #[serde(rename = "SFlag")]
    pub sflag: char,
}

impl DailyObservation {
    pub fn is_missing(&self) -> bool {
        self.value == MISSING_VALUE_LABEL
    }

    /// The date as a real calendar day, or `None` for slots like Feb 30.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(date: &str, value: &str) -> DailyObservation {
        DailyObservation {
            station_id: "USW00094728".to_string(),
            date: date.to_string(),
            element: "PRCP".to_string(),
            value: value.to_string(),
            mflag: ' ',
            qflag: ' ',
            sflag: '7',
        }
    }

    #[test]
    fn test_missing_value() {
        assert!(observation("1950-01-01", "None").is_missing());
        assert!(!observation("1950-01-01", "    0").is_missing());
    }

    #[test]
    fn test_calendar_date() {
        assert_eq!(
            observation("1950-02-28", "   12").calendar_date(),
            NaiveDate::from_ymd_opt(1950, 2, 28)
        );
        assert_eq!(observation("1950-02-30", "None").calendar_date(), None);
        assert_eq!(observation("1950-04-31", "None").calendar_date(), None);
    }
}
