pub mod dates;
pub mod time;

pub use dates::{same_date, CalendarDate, DateParseError};
pub use time::{format_time, parse_time, serde_hhmm, TimeParseError, TimeWindow};
