use chrono::NaiveTime;

use nopal_catalog::{TableCatalog, TableId};
use nopal_shared::{CalendarDate, TimeWindow};

use crate::reservation::Reservation;

/// Whether two booking windows intersect. Half-open, so back-to-back
/// seatings on the same table are fine.
pub fn overlaps(a: &TimeWindow, b: &TimeWindow) -> bool {
    a.overlaps(b)
}

/// Whether `table_id` is free on `date` for the given window.
///
/// Paired tables form one bookable unit: a reservation holding either member
/// of the pair blocks both. The check therefore runs against the whole pair
/// group of the queried table. Cancelled and no-show records hold nothing.
pub fn is_table_free(
    catalog: &TableCatalog,
    table_id: TableId,
    date: CalendarDate,
    time: NaiveTime,
    duration_minutes: u32,
    snapshot: &[Reservation],
) -> bool {
    let group = catalog.pair_group_of(table_id);
    let window = TimeWindow::new(time, duration_minutes);

    !snapshot.iter().any(|r| {
        r.is_active() && r.date == date && r.occupies_any(&group) && r.window().overlaps(&window)
    })
}
