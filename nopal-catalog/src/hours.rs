use chrono::{NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use nopal_shared::{serde_hhmm, CalendarDate};

use crate::table::CatalogError;

/// One open interval within a day, `[open, close)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interval {
    #[serde(with = "serde_hhmm")]
    pub open: NaiveTime,
    #[serde(with = "serde_hhmm")]
    pub close: NaiveTime,
}

impl Interval {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self { open, close }
    }

    fn open_minute(&self) -> u32 {
        self.open.hour() * 60 + self.open.minute()
    }

    fn close_minute(&self) -> u32 {
        self.close.hour() * 60 + self.close.minute()
    }
}

/// Slot generation knobs; the booking rules feed these in.
#[derive(Debug, Clone, Copy)]
pub struct SlotParams {
    pub granularity_minutes: u32,
    pub service_duration_minutes: u32,
    pub min_lead_minutes: u32,
}

impl Default for SlotParams {
    fn default() -> Self {
        Self {
            granularity_minutes: 30,
            service_duration_minutes: 90,
            min_lead_minutes: 30,
        }
    }
}

/// Weekly opening hours, day-of-week keyed (0 = Sunday .. 6 = Saturday).
///
/// A day with no intervals is closed. Absent or malformed day configuration
/// is treated as closed, never as an error at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "DaysSpec", into = "DaysSpec")]
pub struct OperatingHours {
    days: [Vec<Interval>; 7],
}

impl OperatingHours {
    /// Closed every day; build up with `set_day`.
    pub fn closed() -> Self {
        Self {
            days: Default::default(),
        }
    }

    pub fn set_day(&mut self, weekday: Weekday, intervals: Vec<Interval>) {
        self.days[day_index(weekday)] = intervals;
    }

    pub fn intervals_for(&self, weekday: Weekday) -> &[Interval] {
        &self.days[day_index(weekday)]
    }

    pub fn is_closed_on(&self, weekday: Weekday) -> bool {
        self.intervals_for(weekday).is_empty()
    }

    /// Intervals must be chronological, non-overlapping and non-empty.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (index, intervals) in self.days.iter().enumerate() {
            let day = day_name(index);
            let mut previous_close: Option<u32> = None;
            for interval in intervals {
                if interval.open_minute() >= interval.close_minute() {
                    return Err(CatalogError::InvalidHours {
                        day: day.to_string(),
                        detail: format!(
                            "open {} is not before close {}",
                            nopal_shared::format_time(interval.open),
                            nopal_shared::format_time(interval.close)
                        ),
                    });
                }
                if let Some(close) = previous_close {
                    if interval.open_minute() < close {
                        return Err(CatalogError::InvalidHours {
                            day: day.to_string(),
                            detail: "intervals out of order or overlapping".to_string(),
                        });
                    }
                }
                previous_close = Some(interval.close_minute());
            }
        }
        Ok(())
    }

    /// Whether the restaurant is open at `time` on `date`.
    pub fn is_open(&self, date: CalendarDate, time: NaiveTime) -> bool {
        let minute = time.hour() * 60 + time.minute();
        self.intervals_for(date.weekday())
            .iter()
            .any(|i| minute >= i.open_minute() && minute < i.close_minute())
    }

    /// Bookable start times for a day at the configured granularity.
    ///
    /// A slot qualifies when a full service fits before close; the slot at
    /// exactly `close - duration` is included. When `date` is the current
    /// day, slots under the minimum lead time from `now` are dropped.
    pub fn slots_for_day(
        &self,
        date: CalendarDate,
        now: NaiveDateTime,
        params: &SlotParams,
    ) -> Vec<NaiveTime> {
        let lead_cutoff = if now.date() == date.to_naive() {
            Some(now.time().hour() * 60 + now.time().minute() + params.min_lead_minutes)
        } else {
            None
        };

        let mut slots = Vec::new();
        for interval in self.intervals_for(date.weekday()) {
            let close = interval.close_minute();
            let mut minute = interval.open_minute();
            while minute + params.service_duration_minutes <= close {
                let reachable = lead_cutoff.map_or(true, |cutoff| minute >= cutoff);
                if reachable {
                    if let Some(slot) = time_from_minute(minute) {
                        slots.push(slot);
                    }
                }
                minute += params.granularity_minutes.max(1);
            }
        }
        slots
    }
}

fn day_index(weekday: Weekday) -> usize {
    weekday.num_days_from_sunday() as usize
}

fn day_name(index: usize) -> &'static str {
    match index {
        0 => "sunday",
        1 => "monday",
        2 => "tuesday",
        3 => "wednesday",
        4 => "thursday",
        5 => "friday",
        _ => "saturday",
    }
}

fn time_from_minute(minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
}

// Day-name keyed wire form, so config files read naturally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DaysSpec {
    #[serde(default)]
    sunday: Vec<Interval>,
    #[serde(default)]
    monday: Vec<Interval>,
    #[serde(default)]
    tuesday: Vec<Interval>,
    #[serde(default)]
    wednesday: Vec<Interval>,
    #[serde(default)]
    thursday: Vec<Interval>,
    #[serde(default)]
    friday: Vec<Interval>,
    #[serde(default)]
    saturday: Vec<Interval>,
}

impl From<DaysSpec> for OperatingHours {
    fn from(spec: DaysSpec) -> Self {
        Self {
            days: [
                spec.sunday,
                spec.monday,
                spec.tuesday,
                spec.wednesday,
                spec.thursday,
                spec.friday,
                spec.saturday,
            ],
        }
    }
}

impl From<OperatingHours> for DaysSpec {
    fn from(hours: OperatingHours) -> Self {
        let [sunday, monday, tuesday, wednesday, thursday, friday, saturday] = hours.days;
        Self {
            sunday,
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
        }
    }
}

/// The built-in El Nopal week: closed Monday, lunch and dinner service the
/// other six days.
pub fn default_hours() -> OperatingHours {
    let lunch = Interval::new(hm(13, 0), hm(16, 0));
    let dinner = Interval::new(hm(19, 0), hm(23, 30));

    let mut hours = OperatingHours::closed();
    for weekday in [
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ] {
        hours.set_day(weekday, vec![lunch, dinner]);
    }
    hours
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    fn far_away_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_default_hours_validate() {
        default_hours().validate().unwrap();
    }

    #[test]
    fn test_closed_monday() {
        let hours = default_hours();
        // 2025-08-18 is a Monday
        assert!(!hours.is_open(date("2025-08-18"), hm(13, 0)));
        assert!(hours.is_closed_on(Weekday::Mon));
        assert!(hours
            .slots_for_day(date("2025-08-18"), far_away_now(), &SlotParams::default())
            .is_empty());
    }

    #[test]
    fn test_is_open_boundaries() {
        let hours = default_hours();
        let friday = date("2025-08-15");
        assert!(hours.is_open(friday, hm(13, 0))); // opening minute counts
        assert!(!hours.is_open(friday, hm(16, 0))); // closing minute does not
        assert!(!hours.is_open(friday, hm(17, 0))); // between services
        assert!(hours.is_open(friday, hm(20, 0)));
        assert!(!hours.is_open(friday, hm(23, 30)));
    }

    #[test]
    fn test_slots_end_one_service_before_close() {
        let hours = default_hours();
        let slots = hours.slots_for_day(date("2025-08-15"), far_away_now(), &SlotParams::default());

        // Lunch 13:00-16:00 with 90 min service: last slot is 14:30 exactly
        assert_eq!(slots.first().copied(), Some(hm(13, 0)));
        assert!(slots.contains(&hm(14, 30)));
        assert!(!slots.contains(&hm(15, 0)));

        // Dinner 19:00-23:30: last slot is 22:00
        assert!(slots.contains(&hm(22, 0)));
        assert!(!slots.contains(&hm(22, 30)));
    }

    #[test]
    fn test_same_day_lead_time_filter() {
        let hours = default_hours();
        let friday = date("2025-08-15");
        let now = NaiveDate::from_ymd_opt(2025, 8, 15)
            .unwrap()
            .and_hms_opt(13, 10, 0)
            .unwrap();

        let slots = hours.slots_for_day(friday, now, &SlotParams::default());
        // 13:00 and 13:30 are less than 30 minutes out; 13:40 is the cutoff
        assert!(!slots.contains(&hm(13, 0)));
        assert!(!slots.contains(&hm(13, 30)));
        assert_eq!(slots.first().copied(), Some(hm(14, 0)));
    }

    #[test]
    fn test_lead_time_ignored_for_other_days() {
        let hours = default_hours();
        let now = NaiveDate::from_ymd_opt(2025, 8, 14)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        let slots = hours.slots_for_day(date("2025-08-15"), now, &SlotParams::default());
        assert_eq!(slots.first().copied(), Some(hm(13, 0)));
    }

    #[test]
    fn test_validate_rejects_inverted_interval() {
        let mut hours = OperatingHours::closed();
        hours.set_day(Weekday::Tue, vec![Interval::new(hm(16, 0), hm(13, 0))]);
        assert!(hours.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_overlapping_intervals() {
        let mut hours = OperatingHours::closed();
        hours.set_day(
            Weekday::Tue,
            vec![
                Interval::new(hm(13, 0), hm(16, 0)),
                Interval::new(hm(15, 0), hm(18, 0)),
            ],
        );
        assert!(hours.validate().is_err());
    }

    #[test]
    fn test_hours_from_day_keyed_json() {
        let hours: OperatingHours = serde_json::from_str(
            r#"{"tuesday": [{"open": "12:00", "close": "15:00"}]}"#,
        )
        .unwrap();
        assert!(!hours.is_closed_on(Weekday::Tue));
        assert!(hours.is_closed_on(Weekday::Wed));
    }
}
