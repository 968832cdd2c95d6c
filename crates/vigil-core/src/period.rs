// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::VigilError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Calendar month bucket used as the time axis.
///
/// Ordering is chronological. Arithmetic works on a linear month index so
/// offsets cross year boundaries without special cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Builds a period, rejecting months outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, VigilError> {
        if !(1..=12).contains(&month) {
            return Err(VigilError::invalid_input(format!(
                "month must be in 1..=12; got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Months since year 0, January.
    pub fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month - 1)
    }

    pub fn from_index(index: i64) -> Result<Self, VigilError> {
        let year = i32::try_from(index.div_euclid(12)).map_err(|_| {
            VigilError::invalid_input(format!("period index {index} is outside the i32 year range"))
        })?;
        let month = u32::try_from(index.rem_euclid(12)).map_err(|_| {
            VigilError::invalid_input(format!("period index {index} produced an invalid month"))
        })? + 1;
        Ok(Self { year, month })
    }

    /// Shifts by `months` (negative moves backwards).
    pub fn offset(self, months: i64) -> Result<Self, VigilError> {
        let shifted = self.index().checked_add(months).ok_or_else(|| {
            VigilError::invalid_input(format!("period offset overflow: {self} + {months}"))
        })?;
        Self::from_index(shifted)
    }

    pub fn succ(self) -> Result<Self, VigilError> {
        self.offset(1)
    }

    pub fn pred(self) -> Result<Self, VigilError> {
        self.offset(-1)
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(self, other: Self) -> i64 {
        other.index() - self.index()
    }

    /// Buckets a raw timestamp into its calendar month.
    ///
    /// See [`parse_timestamp_date`] for the accepted formats.
    pub fn from_timestamp(raw: &str) -> Result<Self, VigilError> {
        parse_timestamp_date(raw).map(Self::from_date)
    }

    /// First day of this month.
    pub fn first_day(self) -> Result<NaiveDate, VigilError> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(|| {
            VigilError::invalid_input(format!("period {self} has no calendar date"))
        })
    }
}

/// Calendar date of a raw timestamp.
///
/// Accepts RFC 3339 date-times, naive date-times with `T` or space
/// separators, plain `YYYY-MM-DD` dates and `YYYY-MM` month stamps (which map
/// to the first of the month). Offsets are dropped, not converted.
pub fn parse_timestamp_date(raw: &str) -> Result<NaiveDate, VigilError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(VigilError::invalid_input("timestamp is empty"));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.date_naive());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.date());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    trimmed
        .parse::<Period>()
        .and_then(Period::first_day)
        .map_err(|_| VigilError::invalid_input(format!("unparseable timestamp '{trimmed}'")))
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = VigilError;

    /// Parses a `YYYY-MM` month stamp, in exactly the form `Display` writes
    /// (so years outside `0..=9999` round-trip too, e.g. `-001-12`).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || VigilError::invalid_input(format!("period '{raw}' must look like YYYY-MM"));
        let (year_raw, month_raw) = raw.trim().rsplit_once('-').ok_or_else(malformed)?;
        if month_raw.len() != 2 {
            return Err(malformed());
        }
        let year = year_raw
            .parse::<i32>()
            .map_err(|_| VigilError::invalid_input(format!("period '{raw}' has an invalid year")))?;
        if format!("{year:04}") != year_raw {
            return Err(malformed());
        }
        let month = month_raw
            .parse::<u32>()
            .map_err(|_| VigilError::invalid_input(format!("period '{raw}' has an invalid month")))?;
        Self::new(year, month)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
