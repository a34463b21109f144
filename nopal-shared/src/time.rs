use chrono::{NaiveTime, Timelike};

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("unrecognized time format: {0}")]
    UnrecognizedFormat(String),

    #[error("time out of range: {0}")]
    OutOfRange(String),
}

/// Parse a wall-clock time in 24h `HH:MM` form.
pub fn parse_time(input: &str) -> Result<NaiveTime, TimeParseError> {
    let input = input.trim();
    let (h, m) = input
        .split_once(':')
        .ok_or_else(|| TimeParseError::UnrecognizedFormat(input.to_string()))?;

    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return Err(TimeParseError::UnrecognizedFormat(input.to_string()));
    }

    let hour: u32 = h
        .parse()
        .map_err(|_| TimeParseError::UnrecognizedFormat(input.to_string()))?;
    let minute: u32 = m
        .parse()
        .map_err(|_| TimeParseError::UnrecognizedFormat(input.to_string()))?;

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| TimeParseError::OutOfRange(input.to_string()))
}

/// Format a time back to the `HH:MM` wire form.
pub fn format_time(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// A booking window: `[start, start + duration)` in minutes.
///
/// Windows never cross midnight; a seating that starts late enough to run
/// past it is represented with an end minute beyond 24h, which keeps the
/// overlap arithmetic valid for same-day comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub duration_minutes: u32,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, duration_minutes: u32) -> Self {
        Self {
            start,
            duration_minutes,
        }
    }

    pub fn start_minute(&self) -> u32 {
        self.start.hour() * 60 + self.start.minute()
    }

    pub fn end_minute(&self) -> u32 {
        self.start_minute() + self.duration_minutes
    }

    /// Half-open intersection: touching windows do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start_minute() < other.end_minute() && other.start_minute() < self.end_minute()
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        let minute = time.hour() * 60 + time.minute();
        minute >= self.start_minute() && minute < self.end_minute()
    }
}

/// Serde adapter for `HH:MM` time fields, for use with `#[serde(with)]`.
pub mod serde_hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}
