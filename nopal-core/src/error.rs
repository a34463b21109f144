use chrono::NaiveTime;

use nopal_catalog::TableId;
use nopal_shared::{CalendarDate, DateParseError, TimeParseError};

/// Expected business outcomes of a booking query, returned as values.
///
/// `PartySizeExceeded` is a policy refusal (route to manual booking, don't
/// retry); `NoCapacity` means the slot is full (offer other times);
/// `Closed`/`OutsideHours` mean the request never reached the table scan.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("party size must be at least one")]
    EmptyParty,

    #[error("party of {party_size} exceeds the online booking limit of {max}")]
    PartySizeExceeded { party_size: u32, max: u32 },

    #[error("no table can seat a party of {party_size} on {date} at {time}")]
    NoCapacity {
        party_size: u32,
        date: CalendarDate,
        time: NaiveTime,
    },

    #[error("the restaurant is closed on {date}")]
    Closed { date: CalendarDate },

    #[error("{time} on {date} is outside opening hours")]
    OutsideHours {
        date: CalendarDate,
        time: NaiveTime,
    },

    #[error(transparent)]
    MalformedDate(#[from] DateParseError),

    #[error(transparent)]
    MalformedTime(#[from] TimeParseError),

    #[error("unknown table: {0}")]
    UnknownTable(TableId),

    #[error("table {0} is not reservable")]
    NotReservable(TableId),

    #[error("no tables were given")]
    NoTablesGiven,

    #[error("tables {0:?} are not one bookable unit")]
    NotPaired(Vec<TableId>),

    #[error("tables {table_ids:?} cannot seat a party of {party_size}")]
    InsufficientCapacity {
        table_ids: Vec<TableId>,
        party_size: u32,
    },

    #[error("table {0} is already booked for the requested window")]
    TableOccupied(TableId),
}
