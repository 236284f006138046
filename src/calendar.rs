//! Gregorian to Hijri conversion.
//!
//! The countdown only needs the Hijri month and day of a local calendar date,
//! so conversion is a narrow trait. Two implementations are bundled:
//!
//! - [`TabularCalendar`]: the arithmetic (civil) Islamic calendar. Pure integer
//!   math, defined for every date chrono can represent.
//! - [`UmmAlQuraCalendar`]: the table-driven Saudi calendar via the
//!   `hijri_date` crate. Dates outside its table convert to all zeros.
//!
//! The two can disagree by a day around month boundaries.

use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{ISLAMIC_EPOCH, TABULAR_CYCLE_DAYS};
use crate::{HijriDate, ParseError};

/// Converts a Gregorian calendar date into its Hijri equivalent.
///
/// Implementations must be deterministic and must not fail: a field that
/// cannot be produced is reported as `0`.
pub trait HijriCalendar {
    fn to_hijri(&self, date: NaiveDate) -> HijriDate;
}

impl<C: HijriCalendar + ?Sized> HijriCalendar for &C {
    fn to_hijri(&self, date: NaiveDate) -> HijriDate {
        (**self).to_hijri(date)
    }
}

impl<C: HijriCalendar + ?Sized> HijriCalendar for Box<C> {
    fn to_hijri(&self, date: NaiveDate) -> HijriDate {
        (**self).to_hijri(date)
    }
}

/// Hijri date of the local calendar day containing `instant`.
pub fn extract<C, Tz>(calendar: &C, instant: &DateTime<Tz>) -> HijriDate
where
    C: HijriCalendar + ?Sized,
    Tz: TimeZone,
{
    calendar.to_hijri(instant.date_naive())
}

/// Arithmetic Islamic calendar (30-year cycle, leap years 2, 5, 7, 10, 13, 16,
/// 18, 21, 24, 26, 29), epoch 16 July 622 Julian.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabularCalendar;

impl TabularCalendar {
    /// Day number (0001-01-01 = 1) of a tabular Hijri date
    const fn fixed_from_hijri(year: i64, month: i64, day: i64) -> i64 {
        ISLAMIC_EPOCH - 1
            + (year - 1) * 354
            + (3 + 11 * year).div_euclid(30)
            + 29 * (month - 1)
            + month.div_euclid(2)
            + day
    }

    fn hijri_from_fixed(fixed: i64) -> HijriDate {
        let year = (30 * (fixed - ISLAMIC_EPOCH) + 10_646).div_euclid(TABULAR_CYCLE_DAYS);
        let prior_days = fixed - Self::fixed_from_hijri(year, 1, 1);
        let month = (11 * prior_days + 330).div_euclid(325);
        let day = fixed - Self::fixed_from_hijri(year, month, 1) + 1;

        HijriDate::new(
            i32::try_from(year).unwrap_or(0),
            u8::try_from(month).unwrap_or(0),
            u8::try_from(day).unwrap_or(0),
        )
    }
}

impl HijriCalendar for TabularCalendar {
    fn to_hijri(&self, date: NaiveDate) -> HijriDate {
        Self::hijri_from_fixed(i64::from(date.num_days_from_ce()))
    }
}

/// Umm al-Qura calendar backed by the `hijri_date` tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UmmAlQuraCalendar;

impl HijriCalendar for UmmAlQuraCalendar {
    fn to_hijri(&self, date: NaiveDate) -> HijriDate {
        let Ok(year) = usize::try_from(date.year()) else {
            return HijriDate::unknown();
        };

        match hijri_date::HijriDate::from_gr(year, date.month() as usize, date.day() as usize) {
            Ok(hd) => HijriDate::new(
                i32::try_from(hd.year()).unwrap_or(0),
                u8::try_from(hd.month()).unwrap_or(0),
                u8::try_from(hd.day()).unwrap_or(0),
            ),
            Err(e) => {
                debug!(%date, error = %e, "Umm al-Qura conversion unavailable");
                HijriDate::unknown()
            }
        }
    }
}

/// Runtime-selectable calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnyCalendar {
    #[default]
    #[display(fmt = "umm-al-qura")]
    UmmAlQura,
    #[display(fmt = "tabular")]
    Tabular,
}

impl HijriCalendar for AnyCalendar {
    fn to_hijri(&self, date: NaiveDate) -> HijriDate {
        match self {
            Self::UmmAlQura => UmmAlQuraCalendar.to_hijri(date),
            Self::Tabular => TabularCalendar.to_hijri(date),
        }
    }
}

impl FromStr for AnyCalendar {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "umm-al-qura" | "ummalqura" | "islamic-umalqura" => Ok(Self::UmmAlQura),
            "tabular" | "civil" | "islamic-civil" => Ok(Self::Tabular),
            other => Err(ParseError::UnknownCalendar(other.to_owned())),
        }
    }
}
