//! Inclusive date-range filtering for exports.
//!
//! Export requests are expressed in local calendar dates. [`DateRange`]
//! turns them into epoch-millisecond bounds:
//!
//! | Bound | Local time | Inclusive |
//! |-------|------------|-----------|
//! | start | `00:00:00.000` on the start date | yes |
//! | end | `23:59:59.999` on the end date | yes |
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use smsslicer::core::filter::DateRange;
//!
//! # fn main() -> smsslicer::Result<()> {
//! let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let range = DateRange::from_local_dates(day, day)?;
//!
//! assert!(range.contains(range.start_ms));
//! assert!(range.contains(range.end_ms));
//! assert!(!range.contains(range.end_ms + 1));
//! assert_eq!(range.end_ms - range.start_ms, 86_399_999);
//! # Ok(())
//! # }
//! ```

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::{Result, SmsSlicerError};

/// Date format accepted on the command line and in filenames.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `[start_ms, end_ms]` timestamp window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl DateRange {
    /// Builds the window from local midnight of `start` to the last
    /// millisecond of `end`.
    ///
    /// A start later than the end is allowed and matches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SmsSlicerError::InvalidDate`] if a bound does not exist in
    /// the local time zone.
    pub fn from_local_dates(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let start_of_day = start.and_time(NaiveTime::MIN);
        let end_of_day = end.and_time(end_of_day_time());

        let start_ms = Local
            .from_local_datetime(&start_of_day)
            .earliest()
            .or_else(|| first_valid_after(start_of_day))
            .ok_or_else(|| SmsSlicerError::invalid_date(start.to_string()))?
            .timestamp_millis();

        let end_ms = Local
            .from_local_datetime(&end_of_day)
            .latest()
            .ok_or_else(|| SmsSlicerError::invalid_date(end.to_string()))?
            .timestamp_millis();

        Ok(Self { start_ms, end_ms })
    }

    /// Returns `true` if `timestamp_ms` falls inside the window.
    pub fn contains(&self, timestamp_ms: i64) -> bool {
        self.start_ms <= timestamp_ms && timestamp_ms <= self.end_ms
    }
}

fn end_of_day_time() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

/// Midnight can fall inside a DST gap; use the first local hour that exists.
fn first_valid_after(naive: NaiveDateTime) -> Option<chrono::DateTime<Local>> {
    (1..=3).find_map(|hours| {
        Local
            .from_local_datetime(&(naive + chrono::Duration::hours(hours)))
            .earliest()
    })
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`SmsSlicerError::InvalidDate`] if the format is invalid.
///
/// ```
/// use smsslicer::core::filter::parse_date;
///
/// assert!(parse_date("2024-01-31").is_ok());
/// assert!(parse_date("31/01/2024").is_err());
/// ```
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| SmsSlicerError::invalid_date(input))
}
