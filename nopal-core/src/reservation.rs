use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nopal_catalog::TableId;
use nopal_shared::{serde_hhmm, CalendarDate, TimeWindow};

/// Default seating duration in minutes when a record omits it.
pub const DEFAULT_DURATION_MINUTES: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    #[serde(rename = "confirmed")]
    Confirmed,
    #[serde(rename = "cancelled")]
    Cancelled,
    #[serde(rename = "no-show")]
    NoShow,
}

/// Contact details as carried on the wire. Opaque to scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A reservation record as consumed from the external store.
///
/// The snapshot handed to the engine is a plain list of these; the engine
/// never persists or deletes them. Dates deserialize from either wire format
/// and land normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub date: CalendarDate,
    #[serde(with = "serde_hhmm")]
    pub time: NaiveTime,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    pub party_size: u32,
    pub table_ids: Vec<TableId>,
    pub status: ReservationStatus,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

impl Reservation {
    pub fn new(
        date: CalendarDate,
        time: NaiveTime,
        party_size: u32,
        table_ids: Vec<TableId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            time,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            party_size,
            table_ids,
            status: ReservationStatus::Confirmed,
            customer: None,
            created_at: Some(Utc::now()),
        }
    }

    /// Only confirmed reservations hold tables.
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.time, self.duration_minutes)
    }

    /// Whether this reservation sits on any table of `group`.
    pub fn occupies_any(&self, group: &[TableId]) -> bool {
        self.table_ids.iter().any(|id| group.contains(id))
    }

    /// Transition: confirmed -> cancelled.
    pub fn cancel(&mut self) -> Result<(), ReservationError> {
        self.transition(ReservationStatus::Cancelled)
    }

    /// Transition: confirmed -> no-show.
    pub fn mark_no_show(&mut self) -> Result<(), ReservationError> {
        self.transition(ReservationStatus::NoShow)
    }

    fn transition(&mut self, to: ReservationStatus) -> Result<(), ReservationError> {
        if self.status != ReservationStatus::Confirmed {
            return Err(ReservationError::InvalidTransition {
                from: format!("{:?}", self.status),
                to: format!("{to:?}"),
            });
        }
        self.status = to;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}
