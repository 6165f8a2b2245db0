//! Bookable-slot derivation: pure time arithmetic, no I/O.
//!
//! A doctor's weekly windows are stored in 24-hour time; everything the
//! booking flow shows or persists for a slot is the 12-hour label
//! ("09:00 AM"). Labels are derived on demand and never stored alongside
//! the windows themselves.

use anyhow::{Result, anyhow};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

use crate::models::DayAvailability;

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Position of a day name in calendar order, for sorting schedules.
pub fn weekday_index(day: &str) -> Option<usize> {
    WEEKDAY_NAMES.iter().position(|name| *name == day)
}

/// Parse a window bound as clients submit it ("09:00") or as the store
/// returns it ("09:00:00").
pub fn parse_window_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| anyhow!("Invalid 24-hour time: {}", raw))
}

/// 12-hour display label. Midnight is "12:00 AM", noon "12:00 PM",
/// hours zero-padded.
pub fn to_12_hour_label(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

/// Inverse of [`to_12_hour_label`].
pub fn parse_12_hour_label(label: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(label, "%I:%M %p")
        .map_err(|_| anyhow!("Invalid 12-hour time label: {}", label))
}

/// Hour-aligned bookable labels for one window.
///
/// Emits the cursor's label, then advances one hour, while the cursor is
/// strictly before `end`; a trailing partial hour is dropped. An empty or
/// inverted window yields nothing. Windows do not cross midnight, so an
/// advance that wraps the clock ends the run.
pub fn hourly_slots(start: NaiveTime, end: NaiveTime) -> Vec<String> {
    let mut labels = Vec::new();
    let mut cursor = start;

    while cursor < end {
        labels.push(to_12_hour_label(cursor));
        let (next, wrapped) = cursor.overflowing_add_signed(Duration::hours(1));
        if wrapped > 0 {
            break;
        }
        cursor = next;
    }

    labels
}

/// All bookable labels for one weekday: each matching window contributes
/// its own run, concatenated in schedule order.
pub fn slots_for_day(schedule: &[DayAvailability], weekday: Weekday) -> Vec<String> {
    let day = weekday_name(weekday);
    schedule
        .iter()
        .filter(|entry| entry.day == day)
        .flat_map(|entry| hourly_slots(entry.start_time, entry.end_time))
        .collect()
}

/// Date eligibility: not before `today`, and the date's weekday must have
/// at least one availability window. Both conditions are required.
pub fn date_is_bookable(date: NaiveDate, today: NaiveDate, schedule: &[DayAvailability]) -> bool {
    if date < today {
        return false;
    }

    let day = weekday_name(date.weekday());
    schedule.iter().any(|entry| entry.day == day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn window(day: &str, start: &str, end: &str) -> DayAvailability {
        DayAvailability {
            id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            day: day.to_string(),
            start_time: parse_window_time(start).unwrap(),
            end_time: parse_window_time(end).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn full_working_day_yields_eight_slots() {
        let slots = hourly_slots(
            parse_window_time("09:00").unwrap(),
            parse_window_time("17:00").unwrap(),
        );

        assert_eq!(
            slots,
            vec![
                "09:00 AM", "10:00 AM", "11:00 AM", "12:00 PM",
                "01:00 PM", "02:00 PM", "03:00 PM", "04:00 PM",
            ]
        );
    }

    #[test]
    fn midnight_window_renders_twelve_am() {
        let slots = hourly_slots(
            parse_window_time("00:00").unwrap(),
            parse_window_time("02:00").unwrap(),
        );

        assert_eq!(slots, vec!["12:00 AM", "01:00 AM"]);
    }

    #[test]
    fn slot_count_is_whole_hours_only() {
        // 90-minute window: one whole hour, the trailing half dropped
        let slots = hourly_slots(
            parse_window_time("09:00").unwrap(),
            parse_window_time("10:30").unwrap(),
        );
        assert_eq!(slots, vec!["09:00 AM"]);

        // general property: floor(minutes / 60)
        let cases = [("08:00", "12:00", 4), ("13:15", "18:15", 5), ("07:30", "08:00", 0)];
        for (start, end, expected) in cases {
            let slots = hourly_slots(
                parse_window_time(start).unwrap(),
                parse_window_time(end).unwrap(),
            );
            assert_eq!(slots.len(), expected, "{} - {}", start, end);
        }
    }

    #[test]
    fn empty_and_inverted_windows_yield_nothing() {
        let nine = parse_window_time("09:00").unwrap();
        let five = parse_window_time("17:00").unwrap();

        assert!(hourly_slots(nine, nine).is_empty());
        assert!(hourly_slots(five, nine).is_empty());
    }

    #[test]
    fn slots_are_ordered_and_unique() {
        let slots = hourly_slots(
            parse_window_time("06:00").unwrap(),
            parse_window_time("20:00").unwrap(),
        );

        let mut parsed: Vec<NaiveTime> = slots
            .iter()
            .map(|label| parse_12_hour_label(label).unwrap())
            .collect();
        let original = parsed.clone();
        parsed.sort();
        parsed.dedup();

        assert_eq!(parsed, original);
    }

    #[test]
    fn late_window_does_not_wrap_past_midnight() {
        let slots = hourly_slots(
            parse_window_time("22:00").unwrap(),
            parse_window_time("23:30").unwrap(),
        );

        assert_eq!(slots, vec!["10:00 PM", "11:00 PM"]);
    }

    #[test]
    fn label_round_trip_on_half_hour_grid() {
        for hour in 0..24 {
            for minute in [0, 30] {
                let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
                let label = to_12_hour_label(time);
                assert_eq!(parse_12_hour_label(&label).unwrap(), time, "{}", label);
            }
        }
    }

    #[test]
    fn past_dates_are_never_bookable() {
        let schedule = vec![window("Monday", "09:00", "17:00")];
        let today = NaiveDate::from_ymd_opt(2030, 1, 7).unwrap(); // a Monday

        let yesterday = today.pred_opt().unwrap();
        assert!(!date_is_bookable(yesterday, today, &schedule));
        assert!(date_is_bookable(today, today, &schedule));
    }

    #[test]
    fn uncovered_weekday_is_not_bookable() {
        let schedule = vec![window("Monday", "09:00", "17:00")];
        let monday = NaiveDate::from_ymd_opt(2030, 1, 7).unwrap();
        let tuesday = monday.succ_opt().unwrap();

        assert!(date_is_bookable(monday, monday, &schedule));
        assert!(!date_is_bookable(tuesday, monday, &schedule));
    }

    #[test]
    fn day_slots_come_from_matching_windows_only() {
        let schedule = vec![
            window("Monday", "09:00", "11:00"),
            window("Wednesday", "14:00", "16:00"),
        ];

        assert_eq!(
            slots_for_day(&schedule, Weekday::Mon),
            vec!["09:00 AM", "10:00 AM"]
        );
        assert_eq!(
            slots_for_day(&schedule, Weekday::Wed),
            vec!["02:00 PM", "03:00 PM"]
        );
        assert!(slots_for_day(&schedule, Weekday::Fri).is_empty());
    }
}
