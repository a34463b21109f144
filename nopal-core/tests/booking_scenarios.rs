//! End-to-end booking scenarios against the default El Nopal setup.

use nopal_core::{
    BookingError, EngineConfig, Reservation, ReservationEngine, ReservationStatus,
};

fn engine() -> ReservationEngine {
    ReservationEngine::new(EngineConfig::default()).unwrap()
}

/// Reservation snapshots arrive as JSON from the store, with the date
/// format depending on which client wrote the record.
fn snapshot_from_json(raw: &str) -> Vec<Reservation> {
    serde_json::from_str(raw).unwrap()
}

#[test]
fn test_party_of_four_gets_primary_pair_block() {
    let engine = engine();
    let assignment = engine
        .find_assignment(4, "2025-08-15", "20:00", &[])
        .unwrap();

    assert_eq!(assignment.table_ids(), vec![11, 12]);
    assert!(assignment.tables.iter().all(|t| t.reservable));
}

#[test]
fn test_booked_primary_block_falls_through_to_secondary() {
    let engine = engine();

    // Table 11 already holds a confirmed 20:00 booking, recorded with the
    // European date spelling
    let snapshot = snapshot_from_json(
        r#"[{
            "id": "f4d4f1de-8d5c-4f0e-bb0e-3a1f6b1c0001",
            "date": "15/08/2025",
            "time": "20:00",
            "party_size": 2,
            "table_ids": [11],
            "status": "confirmed"
        }]"#,
    );

    let assignment = engine
        .find_assignment(4, "2025-08-15", "20:00", &snapshot)
        .unwrap();
    assert_eq!(assignment.table_ids(), vec![13, 14]);
}

#[test]
fn test_party_of_nine_is_a_policy_refusal_not_a_capacity_failure() {
    let result = engine().find_assignment(9, "2025-08-15", "20:00", &[]);
    assert!(matches!(
        result,
        Err(BookingError::PartySizeExceeded {
            party_size: 9,
            max: 8
        })
    ));
}

#[test]
fn test_closed_monday() {
    let engine = engine();

    // 2025-08-18 is a Monday
    assert!(!engine.is_open("2025-08-18", "13:00").unwrap());
    assert_eq!(engine.available_slots("2025-08-18").unwrap().len(), 0);
    assert!(matches!(
        engine.find_assignment(2, "2025-08-18", "13:00", &[]),
        Err(BookingError::Closed { .. })
    ));
}

#[test]
fn test_small_party_gets_one_table_never_a_pair() {
    let engine = engine();
    for party_size in 1..=3 {
        let assignment = engine
            .find_assignment(party_size, "2025-08-15", "20:00", &[])
            .unwrap();
        assert_eq!(assignment.tables.len(), 1, "party of {party_size}");
    }
}

#[test]
fn test_mid_party_always_gets_a_mutually_paired_pair() {
    let engine = engine();
    for party_size in 4..=5 {
        let assignment = engine
            .find_assignment(party_size, "2025-08-15", "20:00", &[])
            .unwrap();
        assert_eq!(assignment.tables.len(), 2, "party of {party_size}");

        let ids = assignment.table_ids();
        let group = engine.catalog().pair_group_of(ids[0]);
        assert!(ids.iter().all(|id| group.contains(id)));
        assert!(assignment.combined_max_capacity() >= party_size);
    }
}

#[test]
fn test_pairing_symmetry_of_is_table_free() {
    let engine = engine();
    let snapshot = vec![Reservation::new(
        "2025-08-15".parse().unwrap(),
        nopal_shared::parse_time("20:00").unwrap(),
        2,
        vec![11],
    )];

    // Booking 11 makes both members of the unit busy for the window
    assert!(!engine
        .is_table_free(11, "2025-08-15", "20:00", 90, &snapshot)
        .unwrap());
    assert!(!engine
        .is_table_free(12, "2025-08-15", "20:00", 90, &snapshot)
        .unwrap());
    // And free again once the window has passed
    assert!(engine
        .is_table_free(12, "2025-08-15", "21:30", 90, &snapshot)
        .unwrap());
}

#[test]
fn test_same_snapshot_same_answer() {
    let engine = engine();
    let snapshot = snapshot_from_json(
        r#"[{
            "id": "f4d4f1de-8d5c-4f0e-bb0e-3a1f6b1c0002",
            "date": "2025-08-15",
            "time": "20:00",
            "party_size": 4,
            "table_ids": [11, 12],
            "status": "confirmed"
        }]"#,
    );

    let first = engine
        .find_assignment(4, "2025-08-15", "20:00", &snapshot)
        .unwrap();
    let second = engine
        .find_assignment(4, "2025-08-15", "20:00", &snapshot)
        .unwrap();
    assert_eq!(first.table_ids(), second.table_ids());
}

#[test]
fn test_cancelled_booking_frees_its_block() {
    let engine = engine();
    let mut reservation = Reservation::new(
        "2025-08-15".parse().unwrap(),
        nopal_shared::parse_time("20:00").unwrap(),
        4,
        vec![11, 12],
    );
    reservation.cancel().unwrap();
    assert_eq!(reservation.status, ReservationStatus::Cancelled);

    let assignment = engine
        .find_assignment(4, "2025-08-15", "20:00", &[reservation])
        .unwrap();
    assert_eq!(assignment.table_ids(), vec![11, 12]);
}

#[test]
fn test_full_evening_reports_no_capacity() {
    let engine = engine();

    // Every pair block is seated at 20:00
    let snapshot: Vec<Reservation> = [(11, 12), (13, 14), (15, 16), (20, 21), (22, 25)]
        .iter()
        .map(|&(a, b)| {
            Reservation::new(
                "2025-08-15".parse().unwrap(),
                nopal_shared::parse_time("20:00").unwrap(),
                4,
                vec![a, b],
            )
        })
        .collect();

    let result = engine.find_assignment(5, "2025-08-15", "20:00", &snapshot);
    assert!(matches!(result, Err(BookingError::NoCapacity { .. })));

    // The caller's fallback: other dinner slots for the same party
    let now = chrono::NaiveDate::from_ymd_opt(2025, 8, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let alternatives = engine
        .available_slots_for_party_at("2025-08-15", 5, &snapshot, now)
        .unwrap();
    assert!(alternatives.contains(&"21:30".to_string()));
}

#[test]
fn test_slot_grid_respects_service_duration() {
    let engine = engine();
    let now = chrono::NaiveDate::from_ymd_opt(2025, 8, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let slots = engine.available_slots_at("2025-08-15", now).unwrap();

    // Lunch 13:00-16:00, dinner 19:00-23:30, 90-minute service
    assert_eq!(slots.first().map(String::as_str), Some("13:00"));
    assert!(slots.contains(&"14:30".to_string())); // exactly close - duration
    assert!(!slots.contains(&"15:00".to_string()));
    assert!(slots.contains(&"22:00".to_string()));
    assert!(!slots.contains(&"22:30".to_string()));
}
