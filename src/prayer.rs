//! Daily prayer schedules as published per city and month
//! (`{base}/{city}/{YYYY}/{MM}.json`), plus the city list helpers.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::ParseError;
use crate::consts::{SLUG_SEPARATOR, TIME_SEPARATOR};

/// Named times of day in a schedule, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
pub enum Prayer {
    #[display(fmt = "Imsak")]
    Imsak,
    #[display(fmt = "Subuh (Fajr)")]
    Fajr,
    #[display(fmt = "Terbit")]
    Sunrise,
    #[display(fmt = "Dhuha")]
    Duha,
    #[display(fmt = "Dzuhur")]
    Dhuhr,
    #[display(fmt = "Ashar")]
    Asr,
    #[display(fmt = "Maghrib")]
    Maghrib,
    #[display(fmt = "Isya")]
    Isha,
}

impl Prayer {
    /// Every entry, in the order a schedule is displayed
    pub const ALL: [Self; 8] = [
        Self::Imsak,
        Self::Fajr,
        Self::Sunrise,
        Self::Duha,
        Self::Dhuhr,
        Self::Asr,
        Self::Maghrib,
        Self::Isha,
    ];

    /// Entries eligible to be "next"; sunrise and duha are informational
    pub const UPCOMING_ORDER: [Self; 6] = [
        Self::Imsak,
        Self::Fajr,
        Self::Dhuhr,
        Self::Asr,
        Self::Maghrib,
        Self::Isha,
    ];
}

/// One day of a monthly schedule. Times are kept as published (`"HH:MM"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySchedule {
    #[serde(rename = "tanggal")]
    pub date: NaiveDate,
    #[serde(rename = "imsyak", default, skip_serializing_if = "Option::is_none")]
    pub imsak: Option<String>,
    #[serde(rename = "shubuh", default, skip_serializing_if = "Option::is_none")]
    pub fajr: Option<String>,
    #[serde(rename = "terbit", default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<String>,
    #[serde(rename = "dhuha", default, skip_serializing_if = "Option::is_none")]
    pub duha: Option<String>,
    #[serde(rename = "dzuhur", default, skip_serializing_if = "Option::is_none")]
    pub dhuhr: Option<String>,
    #[serde(rename = "ashr", default, skip_serializing_if = "Option::is_none")]
    pub asr: Option<String>,
    #[serde(rename = "magrib", default, skip_serializing_if = "Option::is_none")]
    pub maghrib: Option<String>,
    #[serde(rename = "isya", default, skip_serializing_if = "Option::is_none")]
    pub isha: Option<String>,
}

impl DailySchedule {
    /// The published value for `prayer`, if present
    pub fn time(&self, prayer: Prayer) -> Option<&str> {
        let field = match prayer {
            Prayer::Imsak => &self.imsak,
            Prayer::Fajr => &self.fajr,
            Prayer::Sunrise => &self.sunrise,
            Prayer::Duha => &self.duha,
            Prayer::Dhuhr => &self.dhuhr,
            Prayer::Asr => &self.asr,
            Prayer::Maghrib => &self.maghrib,
            Prayer::Isha => &self.isha,
        };
        field.as_deref().filter(|value| !value.is_empty())
    }

    /// Present entries in display order
    pub fn entries(&self) -> impl Iterator<Item = (Prayer, &str)> + '_ {
        Prayer::ALL
            .into_iter()
            .filter_map(|prayer| self.time(prayer).map(|value| (prayer, value)))
    }

    /// The first prayer whose time is strictly later than `now` (to the
    /// minute). Once every time has passed, the earliest present entry is
    /// returned since it is next on the following day.
    pub fn next_prayer(&self, now: NaiveTime) -> Option<Prayer> {
        let now_minutes = now.hour() * 60 + now.minute();

        let upcoming = Prayer::UPCOMING_ORDER.into_iter().find(|&prayer| {
            self.time(prayer)
                .and_then(|value| value.parse::<TimeOfDay>().ok())
                .is_some_and(|time| time.minutes() > now_minutes)
        });

        upcoming.or_else(|| {
            Prayer::UPCOMING_ORDER
                .into_iter()
                .find(|&prayer| self.time(prayer).is_some())
        })
    }
}

/// The entry for `date` in a monthly schedule
pub fn schedule_for_date(schedules: &[DailySchedule], date: NaiveDate) -> Option<&DailySchedule> {
    schedules.iter().find(|day| day.date == date)
}

/// An `"HH:MM"` time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:02}:{:02}", "_0.hour()", "_0.minute()")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Minutes since midnight
    pub fn minutes(self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    fn parse_u32(s: &str) -> Result<u32, ParseError> {
        s.trim()
            .parse::<u32>()
            .map_err(|_| ParseError::InvalidTime(s.to_owned()))
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let (hours, minutes) = trimmed
            .split_once(TIME_SEPARATOR)
            .ok_or_else(|| ParseError::InvalidTime(s.to_owned()))?;

        let hours = Self::parse_u32(hours)?;
        let minutes = Self::parse_u32(minutes)?;

        NaiveTime::from_hms_opt(hours, minutes, 0)
            .map(Self)
            .ok_or_else(|| ParseError::InvalidTime(s.to_owned()))
    }
}

/// Drops repeated slugs, keeping the first occurrence of each.
pub fn unique_cities<I>(slugs: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    slugs
        .into_iter()
        .filter(|slug| seen.insert(slug.clone()))
        .collect()
}

/// Human-readable city name: `"kota-bandung"` becomes `"Kota Bandung"`.
pub fn city_display_name(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut at_word_start = true;

    for c in slug.chars() {
        let c = if c == SLUG_SEPARATOR { ' ' } else { c };
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !is_word;
    }
    out
}

/// URL of the monthly schedule for `city`
pub fn schedule_url(base: &str, city: &str, year: i32, month: u32) -> String {
    format!("{}/{city}/{year}/{month:02}.json", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"tanggal":"2025-03-01","imsyak":"04:23","shubuh":"04:33","terbit":"05:48","dhuha":"06:15","dzuhur":"11:58","ashr":"15:07","magrib":"18:02","isya":"19:11"},
        {"tanggal":"2025-03-02","imsyak":"04:23","shubuh":"04:33","terbit":"05:48","dhuha":"06:15","dzuhur":"11:58","ashr":"15:06","magrib":"18:01","isya":"19:10"}
    ]"#;

    fn sample() -> Vec<DailySchedule> {
        serde_json::from_str(SAMPLE).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_decode_schedule() {
        let days = sample();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(days[0].time(Prayer::Fajr), Some("04:33"));
        assert_eq!(days[1].time(Prayer::Maghrib), Some("18:01"));
    }

    #[test]
    fn test_decode_partial_schedule() {
        let day: DailySchedule =
            serde_json::from_str(r#"{"tanggal":"2025-03-01","shubuh":"04:33","isya":""}"#).unwrap();
        assert_eq!(day.time(Prayer::Fajr), Some("04:33"));
        assert_eq!(day.time(Prayer::Imsak), None);
        assert_eq!(day.time(Prayer::Isha), None, "empty string counts as missing");
    }

    #[test]
    fn test_schedule_for_date() {
        let days = sample();
        let date = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        assert_eq!(schedule_for_date(&days, date).map(|d| d.date), Some(date));

        let missing = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert!(schedule_for_date(&days, missing).is_none());
    }

    #[test]
    fn test_next_prayer_cases() {
        struct TestCase {
            now: (u32, u32),
            expected: Prayer,
            description: &'static str,
        }

        let cases = [
            TestCase {
                now: (0, 5),
                expected: Prayer::Imsak,
                description: "after midnight",
            },
            TestCase {
                now: (4, 23),
                expected: Prayer::Fajr,
                description: "imsak minute itself has passed",
            },
            TestCase {
                now: (6, 0),
                expected: Prayer::Dhuhr,
                description: "sunrise and duha are skipped",
            },
            TestCase {
                now: (15, 6),
                expected: Prayer::Asr,
                description: "one minute before asr",
            },
            TestCase {
                now: (18, 30),
                expected: Prayer::Isha,
                description: "between maghrib and isha",
            },
            TestCase {
                now: (23, 59),
                expected: Prayer::Imsak,
                description: "all passed wraps to first",
            },
        ];

        let day = &sample()[0];
        for case in &cases {
            let (h, m) = case.now;
            assert_eq!(
                day.next_prayer(at(h, m)),
                Some(case.expected),
                "{h:02}:{m:02} ({})",
                case.description
            );
        }
    }

    #[test]
    fn test_next_prayer_ignores_seconds() {
        let day = &sample()[0];
        let now = NaiveTime::from_hms_opt(11, 57, 59).unwrap();
        assert_eq!(day.next_prayer(now), Some(Prayer::Dhuhr));
        let now = NaiveTime::from_hms_opt(11, 58, 1).unwrap();
        assert_eq!(day.next_prayer(now), Some(Prayer::Asr));
    }

    #[test]
    fn test_next_prayer_fallback_without_imsak() {
        let json = r#"{"tanggal":"2025-03-01","shubuh":"04:33","isya":"19:11"}"#;
        let day: DailySchedule = serde_json::from_str(json).unwrap();
        assert_eq!(day.next_prayer(at(20, 0)), Some(Prayer::Fajr));
    }

    #[test]
    fn test_next_prayer_skips_unparsable_values() {
        let day: DailySchedule = serde_json::from_str(
            r#"{"tanggal":"2025-03-01","imsyak":"n/a","shubuh":"04:33"}"#,
        )
        .unwrap();
        assert_eq!(day.next_prayer(at(1, 0)), Some(Prayer::Fajr));
        // Fallback considers presence, not parseability
        assert_eq!(day.next_prayer(at(5, 0)), Some(Prayer::Imsak));
    }

    #[test]
    fn test_next_prayer_empty_schedule() {
        let day: DailySchedule = serde_json::from_str(r#"{"tanggal":"2025-03-01"}"#).unwrap();
        assert_eq!(day.next_prayer(at(12, 0)), None);
    }

    #[test]
    fn test_entries_in_display_order() {
        let day = &sample()[0];
        let labels: Vec<String> = day.entries().map(|(p, _)| p.to_string()).collect();
        assert_eq!(
            labels,
            ["Imsak", "Subuh (Fajr)", "Terbit", "Dhuha", "Dzuhur", "Ashar", "Maghrib", "Isya"]
        );
    }

    #[test]
    fn test_time_of_day_parse() {
        let time: TimeOfDay = "04:33".parse().unwrap();
        assert_eq!(time.minutes(), 4 * 60 + 33);
        assert_eq!(time.to_string(), "04:33");
        assert_eq!(" 7:05 ".parse::<TimeOfDay>().unwrap().to_string(), "07:05");

        assert!(matches!("".parse::<TimeOfDay>(), Err(ParseError::EmptyInput)));
        assert!(matches!("0433".parse::<TimeOfDay>(), Err(ParseError::InvalidTime(_))));
        assert!(matches!("24:00".parse::<TimeOfDay>(), Err(ParseError::InvalidTime(_))));
        assert!(matches!("aa:10".parse::<TimeOfDay>(), Err(ParseError::InvalidTime(_))));
    }

    #[test]
    fn test_unique_cities_keeps_first_occurrence() {
        let slugs = ["semarang", "ambon", "semarang", "kota-bandung", "ambon"]
            .map(String::from);
        assert_eq!(unique_cities(slugs), ["semarang", "ambon", "kota-bandung"]);
    }

    #[test]
    fn test_city_display_name() {
        assert_eq!(city_display_name("semarang"), "Semarang");
        assert_eq!(city_display_name("kota-bandung"), "Kota Bandung");
        assert_eq!(city_display_name("kab.-bandung-barat"), "Kab. Bandung Barat");
        assert_eq!(city_display_name(""), "");
    }

    #[test]
    fn test_schedule_url() {
        assert_eq!(
            schedule_url("https://example.org/adzan/", "semarang", 2025, 3),
            "https://example.org/adzan/semarang/2025/03.json"
        );
    }
}
