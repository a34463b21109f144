use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A calendar date normalized from either wire format.
///
/// Reservation records and form inputs arrive as `YYYY-MM-DD` or
/// `DD/MM/YYYY`, inconsistently. All date comparison routes through this
/// type so two spellings of the same day compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum DateParseError {
    #[error("unrecognized date format: {0}")]
    UnrecognizedFormat(String),

    #[error("date out of range: {0}")]
    OutOfRange(String),
}

impl CalendarDate {
    /// Build a date, rejecting impossible calendar values (Feb 30 etc.).
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateParseError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(|_| Self { year, month, day })
            .ok_or_else(|| DateParseError::OutOfRange(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Parse either `YYYY-MM-DD` or `DD/MM/YYYY`.
    ///
    /// The year must be four digits; day and month may be one or two.
    /// Anything else is an error, never a guess.
    pub fn parse(input: &str) -> Result<Self, DateParseError> {
        let input = input.trim();

        let (year, month, day) = if let Some((y, m, d)) = split3(input, '-') {
            (y, m, d)
        } else if let Some((d, m, y)) = split3(input, '/') {
            (y, m, d)
        } else {
            return Err(DateParseError::UnrecognizedFormat(input.to_string()));
        };

        if year.len() != 4 || month.is_empty() || month.len() > 2 || day.is_empty() || day.len() > 2
        {
            return Err(DateParseError::UnrecognizedFormat(input.to_string()));
        }

        let year: i32 = parse_component(year, input)?;
        let month: u32 = parse_component(month, input)?;
        let day: u32 = parse_component(day, input)?;

        Self::new(year, month, day)
    }

    pub fn weekday(&self) -> Weekday {
        self.to_naive().weekday()
    }

    pub fn to_naive(&self) -> NaiveDate {
        // Validated at construction, so this cannot be out of range.
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .unwrap_or(NaiveDate::MIN)
    }
}

fn split3(input: &str, sep: char) -> Option<(&str, &str, &str)> {
    let mut parts = input.split(sep);
    let a = parts.next()?;
    let b = parts.next()?;
    let c = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((a, b, c))
}

fn parse_component<T: FromStr>(component: &str, input: &str) -> Result<T, DateParseError> {
    component
        .parse()
        .map_err(|_| DateParseError::UnrecognizedFormat(input.to_string()))
}

/// Format-agnostic date equality. False when either side is unparseable.
pub fn same_date(a: &str, b: &str) -> bool {
    match (CalendarDate::parse(a), CalendarDate::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Serialized as ISO regardless of the format it was parsed from.
impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
