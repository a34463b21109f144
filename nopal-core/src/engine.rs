use chrono::{Local, NaiveDateTime, NaiveTime};
use tracing::{debug, info, warn};

use nopal_catalog::{CatalogError, OperatingHours, Table, TableCatalog, TableId};
use nopal_shared::{format_time, parse_time, CalendarDate};

use crate::assignment::{assign, Assignment, TierPolicy};
use crate::config::{BookingRules, EngineConfig};
use crate::conflict::is_table_free;
use crate::error::BookingError;
use crate::reservation::Reservation;

/// The booking core: operating hours gate, availability index and tiered
/// table assignment behind one functional API.
///
/// The engine owns no reservation state. Every query takes the caller's
/// snapshot of existing reservations and computes a deterministic answer
/// from it; persistence, re-validation at commit time and races between
/// concurrent requests belong to the layer that owns the store.
pub struct ReservationEngine {
    catalog: TableCatalog,
    hours: OperatingHours,
    rules: BookingRules,
    policy: TierPolicy,
}

impl ReservationEngine {
    /// Build an engine, validating layout, hours and tier policy up front.
    /// A corrupt configuration is a hard error; it must never answer
    /// queries.
    pub fn new(config: EngineConfig) -> Result<Self, CatalogError> {
        let catalog = TableCatalog::new(config.tables)?;
        config.hours.validate()?;
        config.policy.validate(&catalog)?;

        info!(
            "reservation engine ready: {} tables, max online party {}",
            catalog.len(),
            config.rules.max_party_size
        );

        Ok(Self {
            catalog,
            hours: config.hours,
            rules: config.rules,
            policy: config.policy,
        })
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    /// Find the table or pair for a party, or say why there is none.
    ///
    /// Checks run in order: party-size policy, opening hours, then the tier
    /// scan. The two failure families differ: `PartySizeExceeded` is a
    /// policy refusal for staff handling, `NoCapacity` means the slot is
    /// simply full.
    pub fn find_assignment(
        &self,
        party_size: u32,
        date: &str,
        time: &str,
        snapshot: &[Reservation],
    ) -> Result<Assignment, BookingError> {
        if party_size == 0 {
            return Err(BookingError::EmptyParty);
        }
        if party_size > self.rules.max_party_size {
            debug!(
                "party of {} over the online limit {}, refusing",
                party_size, self.rules.max_party_size
            );
            return Err(BookingError::PartySizeExceeded {
                party_size,
                max: self.rules.max_party_size,
            });
        }

        let date = CalendarDate::parse(date)?;
        let time = parse_time(time)?;
        self.check_open(date, time)?;
        self.warn_on_unknown_tables(snapshot);

        assign(
            &self.catalog,
            &self.policy,
            party_size,
            date,
            time,
            self.rules.service_duration_minutes,
            snapshot,
        )
        .ok_or(BookingError::NoCapacity {
            party_size,
            date,
            time,
        })
    }

    /// Whether the restaurant is open at the given date and time.
    pub fn is_open(&self, date: &str, time: &str) -> Result<bool, BookingError> {
        let date = CalendarDate::parse(date)?;
        let time = parse_time(time)?;
        Ok(self.hours.is_open(date, time))
    }

    /// Bookable `HH:MM` start times for a date. Empty when closed.
    pub fn available_slots(&self, date: &str) -> Result<Vec<String>, BookingError> {
        self.available_slots_at(date, Local::now().naive_local())
    }

    /// Pure variant of `available_slots` with an explicit clock reading,
    /// used for the same-day lead-time cutoff.
    pub fn available_slots_at(
        &self,
        date: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<String>, BookingError> {
        let date = CalendarDate::parse(date)?;
        let slots = self
            .hours
            .slots_for_day(date, now, &self.rules.slot_params());
        Ok(slots.into_iter().map(format_time).collect())
    }

    /// The slots of `available_slots` narrowed to those where the party
    /// would actually get a table, given the snapshot. This is what the
    /// booking flow offers after a `NoCapacity` answer.
    pub fn available_slots_for_party(
        &self,
        date: &str,
        party_size: u32,
        snapshot: &[Reservation],
    ) -> Result<Vec<String>, BookingError> {
        self.available_slots_for_party_at(date, party_size, snapshot, Local::now().naive_local())
    }

    pub fn available_slots_for_party_at(
        &self,
        date: &str,
        party_size: u32,
        snapshot: &[Reservation],
        now: NaiveDateTime,
    ) -> Result<Vec<String>, BookingError> {
        if party_size == 0 {
            return Err(BookingError::EmptyParty);
        }
        if party_size > self.rules.max_party_size {
            return Err(BookingError::PartySizeExceeded {
                party_size,
                max: self.rules.max_party_size,
            });
        }

        let parsed = CalendarDate::parse(date)?;
        let slots = self
            .hours
            .slots_for_day(parsed, now, &self.rules.slot_params());

        Ok(slots
            .into_iter()
            .filter(|&slot| {
                assign(
                    &self.catalog,
                    &self.policy,
                    party_size,
                    parsed,
                    slot,
                    self.rules.service_duration_minutes,
                    snapshot,
                )
                .is_some()
            })
            .map(format_time)
            .collect())
    }

    /// Tables that could seat the party and are free for the window, in
    /// catalog order. Recomputed from the snapshot on every call.
    pub fn free_tables<'a>(
        &'a self,
        date: &str,
        time: &str,
        duration_minutes: u32,
        party_size: u32,
        snapshot: &'a [Reservation],
    ) -> Result<Vec<&'a Table>, BookingError> {
        let date = CalendarDate::parse(date)?;
        let time = parse_time(time)?;
        Ok(crate::availability::free_tables(
            &self.catalog,
            date,
            time,
            duration_minutes,
            party_size,
            snapshot,
        )
        .collect())
    }

    /// Whether one table is free for a window, pair group included.
    pub fn is_table_free(
        &self,
        table_id: TableId,
        date: &str,
        time: &str,
        duration_minutes: u32,
        snapshot: &[Reservation],
    ) -> Result<bool, BookingError> {
        if !self.catalog.contains(table_id) {
            return Err(BookingError::UnknownTable(table_id));
        }
        let date = CalendarDate::parse(date)?;
        let time = parse_time(time)?;
        Ok(is_table_free(
            &self.catalog,
            table_id,
            date,
            time,
            duration_minutes,
            snapshot,
        ))
    }

    /// Validate a staff-picked table choice for a party.
    ///
    /// The back office may force any concrete table(s); this checks the
    /// choice is physically bookable: known, reservable, one merged unit,
    /// enough stretched capacity, and free for the window. Opening hours
    /// are deliberately not enforced here, staff book outside public hours.
    pub fn validate_manual_assignment(
        &self,
        table_ids: &[TableId],
        party_size: u32,
        date: &str,
        time: &str,
        snapshot: &[Reservation],
    ) -> Result<(), BookingError> {
        if table_ids.is_empty() {
            return Err(BookingError::NoTablesGiven);
        }
        if party_size == 0 {
            return Err(BookingError::EmptyParty);
        }

        let date = CalendarDate::parse(date)?;
        let time = parse_time(time)?;

        let mut stretched = 0;
        for &id in table_ids {
            let table = self
                .catalog
                .table(id)
                .ok_or(BookingError::UnknownTable(id))?;
            if !table.reservable {
                return Err(BookingError::NotReservable(id));
            }
            stretched += table.max_capacity;
        }

        if table_ids.len() > 1 {
            let group = self.catalog.pair_group_of(table_ids[0]);
            if table_ids.iter().any(|id| !group.contains(id)) {
                return Err(BookingError::NotPaired(table_ids.to_vec()));
            }
        }

        if stretched < party_size {
            return Err(BookingError::InsufficientCapacity {
                table_ids: table_ids.to_vec(),
                party_size,
            });
        }

        let duration = self.rules.service_duration_minutes;
        for &id in table_ids {
            if !is_table_free(&self.catalog, id, date, time, duration, snapshot) {
                return Err(BookingError::TableOccupied(id));
            }
        }

        Ok(())
    }

    fn check_open(&self, date: CalendarDate, time: NaiveTime) -> Result<(), BookingError> {
        if self.hours.is_closed_on(date.weekday()) {
            return Err(BookingError::Closed { date });
        }
        if !self.hours.is_open(date, time) {
            return Err(BookingError::OutsideHours { date, time });
        }
        Ok(())
    }

    fn warn_on_unknown_tables(&self, snapshot: &[Reservation]) {
        for r in snapshot.iter().filter(|r| r.is_active()) {
            for &id in &r.table_ids {
                if !self.catalog.contains(id) {
                    warn!("reservation {} references unknown table {}", r.id, id);
                }
            }
        }
    }
}
