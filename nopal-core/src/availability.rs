use chrono::NaiveTime;

use nopal_catalog::{Table, TableCatalog};
use nopal_shared::CalendarDate;

use crate::conflict::is_table_free;
use crate::reservation::Reservation;

/// Reservable tables that could seat `party_size` and are free for the
/// window, lazily, in catalog order.
///
/// Recomputed from the snapshot on every call; the engine keeps no cache, so
/// a fresh snapshot always gives a fresh answer.
pub fn free_tables<'a>(
    catalog: &'a TableCatalog,
    date: CalendarDate,
    time: NaiveTime,
    duration_minutes: u32,
    party_size: u32,
    snapshot: &'a [Reservation],
) -> impl Iterator<Item = &'a Table> {
    catalog.all_reservable().filter(move |table| {
        table.capacity >= party_size
            && is_table_free(catalog, table.id, date, time, duration_minutes, snapshot)
    })
}
