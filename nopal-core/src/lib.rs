pub mod assignment;
pub mod availability;
pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod reservation;

pub use assignment::{Assignment, TierPolicy};
pub use availability::free_tables;
pub use config::{BookingRules, EngineConfig};
pub use conflict::{is_table_free, overlaps};
pub use engine::ReservationEngine;
pub use error::BookingError;
pub use reservation::{Customer, Reservation, ReservationError, ReservationStatus};
