use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone};
use tracing::warn;

use crate::calendar::HijriCalendar;
use crate::consts::SCAN_HORIZON_DAYS;
use crate::{HijriDay, HijriMonth};

/// Finds the next local midnight, on or after the day containing `from`,
/// whose Hijri month and day equal the target.
///
/// At most [`SCAN_HORIZON_DAYS`] consecutive days are examined. Returns
/// `None` if none of them match, which only happens when the calendar
/// reports zeroed fields for the whole window.
pub fn find_next_match<C, Tz>(
    calendar: &C,
    month: HijriMonth,
    day: HijriDay,
    from: &DateTime<Tz>,
) -> Option<DateTime<Tz>>
where
    C: HijriCalendar + ?Sized,
    Tz: TimeZone,
{
    let probe = from.date_naive();

    let found = (0..SCAN_HORIZON_DAYS)
        .map_while(|offset| probe.checked_add_days(Days::new(offset)))
        .find(|candidate| calendar.to_hijri(*candidate).matches(month, day));

    let Some(date) = found else {
        warn!(%probe, %month, %day, "no matching Hijri date within {SCAN_HORIZON_DAYS} days");
        return None;
    };

    start_of_day(&from.timezone(), date)
}

/// First instant of `date` in `tz`.
///
/// Midnight can be skipped by a daylight-saving transition, in which case the
/// first hour that exists locally is used.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    if let Some(midnight) = tz.from_local_datetime(&date.and_time(NaiveTime::MIN)).earliest() {
        return Some(midnight);
    }

    (1..24)
        .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HijriDate;
    use crate::calendar::TabularCalendar;
    use chrono::{FixedOffset, LocalResult, NaiveDateTime, Timelike, Utc};
    use std::cell::Cell;

    /// São Paulo around 4 November 2018: local clocks jumped from 00:00 -03
    /// straight to 01:00 -02, so that day had no midnight.
    #[derive(Debug, Clone, Copy)]
    struct SpringForward;

    impl SpringForward {
        fn gap_day() -> NaiveDate {
            NaiveDate::from_ymd_opt(2018, 11, 4).unwrap()
        }

        fn standard() -> FixedOffset {
            FixedOffset::west_opt(3 * 3600).unwrap()
        }

        fn summer() -> FixedOffset {
            FixedOffset::west_opt(2 * 3600).unwrap()
        }
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            Self
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            if *local < Self::gap_day() {
                LocalResult::Single(Self::standard())
            } else {
                LocalResult::Single(Self::summer())
            }
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let gap_start = Self::gap_day().and_time(NaiveTime::MIN);
            let gap_end = Self::gap_day().and_hms_opt(1, 0, 0).unwrap();

            if *local < gap_start {
                LocalResult::Single(Self::standard())
            } else if *local < gap_end {
                LocalResult::None
            } else {
                LocalResult::Single(Self::summer())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::gap_day().and_hms_opt(3, 0, 0).unwrap() {
                Self::standard()
            } else {
                Self::summer()
            }
        }
    }

    /// Calendar that never produces a usable date and counts lookups
    struct Blank {
        calls: Cell<u64>,
    }

    impl HijriCalendar for Blank {
        fn to_hijri(&self, _date: NaiveDate) -> HijriDate {
            self.calls.set(self.calls.get() + 1);
            HijriDate::unknown()
        }
    }

    fn ramadan_first() -> (HijriMonth, HijriDay) {
        (HijriMonth::RAMADAN, HijriDay::first())
    }

    #[test]
    fn test_finds_next_ramadan() {
        let from = Utc.with_ymd_and_hms(2024, 10, 1, 15, 45, 12).unwrap();
        let (month, day) = ramadan_first();

        let found = find_next_match(&TabularCalendar, month, day, &from).unwrap();
        assert_eq!(found, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_finds_next_eid() {
        let from = Utc.with_ymd_and_hms(2025, 3, 15, 9, 0, 0).unwrap();

        let found =
            find_next_match(&TabularCalendar, HijriMonth::SHAWWAL, HijriDay::first(), &from)
                .unwrap();
        assert_eq!(found, Utc.with_ymd_and_hms(2025, 3, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_match_on_current_day_returns_its_midnight() {
        let from = Utc.with_ymd_and_hms(2025, 3, 1, 18, 30, 0).unwrap();
        let (month, day) = ramadan_first();

        let found = find_next_match(&TabularCalendar, month, day, &from).unwrap();
        assert_eq!(found, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        assert!(found <= from);
    }

    #[test]
    fn test_day_after_target_rolls_to_next_year() {
        let from = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        let (month, day) = ramadan_first();

        let found = find_next_match(&TabularCalendar, month, day, &from).unwrap();
        assert_eq!(found, Utc.with_ymd_and_hms(2026, 2, 18, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_result_is_local_midnight() {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let from = offset.with_ymd_and_hms(2024, 12, 5, 23, 59, 59).unwrap();
        let (month, day) = ramadan_first();

        let found = find_next_match(&TabularCalendar, month, day, &from).unwrap();
        assert_eq!(found.timezone(), offset);
        assert_eq!((found.hour(), found.minute(), found.second()), (0, 0, 0));
        assert_eq!(found.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_every_target_found_within_horizon() {
        let from = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        for m in 1..=12 {
            for d in 1..=29 {
                let month = HijriMonth::new(m).unwrap();
                let day = HijriDay::new(d).unwrap();
                let found = find_next_match(&TabularCalendar, month, day, &from);
                assert!(found.is_some(), "no match for {m}/{d}");
            }
        }
    }

    #[test]
    fn test_scan_is_bounded() {
        let blank = Blank { calls: Cell::new(0) };
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let (month, day) = ramadan_first();

        assert!(find_next_match(&blank, month, day, &from).is_none());
        assert_eq!(blank.calls.get(), SCAN_HORIZON_DAYS);
    }

    #[test]
    fn test_scan_stops_at_end_of_representable_dates() {
        let blank = Blank { calls: Cell::new(0) };
        let from = Utc.from_utc_datetime(&NaiveDate::MAX.and_time(NaiveTime::MIN));
        let (month, day) = ramadan_first();

        assert!(find_next_match(&blank, month, day, &from).is_none());
        assert_eq!(blank.calls.get(), 1);
    }

    #[test]
    fn test_start_of_day_fixed_offset() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let start = start_of_day(&offset, date).unwrap();
        assert_eq!(start.naive_local(), date.and_time(NaiveTime::MIN));
        assert_eq!(start.with_timezone(&Utc).hour(), 5);
    }

    #[test]
    fn test_start_of_day_skipped_midnight() {
        let start = start_of_day(&SpringForward, SpringForward::gap_day()).unwrap();

        assert_eq!(start.naive_local(), SpringForward::gap_day().and_hms_opt(1, 0, 0).unwrap());
        assert_eq!(start.offset(), &SpringForward::summer());
        assert_eq!(start.with_timezone(&Utc), Utc.with_ymd_and_hms(2018, 11, 4, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_day_around_the_gap() {
        let before = NaiveDate::from_ymd_opt(2018, 11, 3).unwrap();
        let after = NaiveDate::from_ymd_opt(2018, 11, 5).unwrap();

        let start = start_of_day(&SpringForward, before).unwrap();
        assert_eq!(start.naive_local(), before.and_time(NaiveTime::MIN));
        assert_eq!(start.offset(), &SpringForward::standard());

        let start = start_of_day(&SpringForward, after).unwrap();
        assert_eq!(start.naive_local(), after.and_time(NaiveTime::MIN));
        assert_eq!(start.offset(), &SpringForward::summer());
    }
}
