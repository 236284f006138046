//! Countdown to the next Ramadan or Eid al-Fitr on the Hijri calendar, with
//! helpers for daily prayer schedules and a random hadith.
//!
//! The countdown is a pure function of "now":
//!
//! 1. The Hijri date of the local day is read through a [`HijriCalendar`].
//! 2. During Ramadan (month 9) the target is 1 Shawwal, otherwise 1 Ramadan.
//! 3. The next local midnight falling on that Hijri date is found by scanning
//!    forward at most [`SCAN_HORIZON_DAYS`] days.
//! 4. The time left is broken down into days, hours, minutes and seconds.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use ramadan_countdown::{TabularCalendar, countdown_status};
//!
//! let now = Utc.with_ymd_and_hms(2025, 2, 27, 22, 58, 59).unwrap();
//! let status = countdown_status(&TabularCalendar, &now);
//!
//! assert_eq!(status.label(), "Countdown to Ramadan");
//! let left = status.remaining().unwrap();
//! assert_eq!((left.days, left.hours, left.minutes, left.seconds), (1, 1, 1, 1));
//! ```
//!
//! [`CountdownSession`] runs the same computation on a one-second tokio
//! interval for as long as its handle is alive.

mod consts;
mod types;

pub mod calendar;
pub mod client;
pub mod countdown;
pub mod hadith;
pub mod prayer;
pub mod retry;
pub mod scan;
pub mod session;

pub use calendar::{AnyCalendar, HijriCalendar, TabularCalendar, UmmAlQuraCalendar, extract};
pub use client::{ApiClient, Endpoints, FetchError};
pub use consts::*;
pub use countdown::{
    CountdownStatus, CountdownTarget, Phase, RemainingTime, countdown_status, remaining,
    select_target,
};
pub use scan::find_next_match;
pub use session::{Clock, CountdownSession, SystemClock, TargetTracker, UtcClock};
pub use types::{HijriDate, HijriDay, HijriMonth};

use derive_more::Display;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid Hijri month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid Hijri day: {} (must be {}-{})", "_0", MIN_DAY, MAX_DAY)]
    InvalidDay(u8),
    #[display(fmt = "Invalid time of day: {_0} (expected HH:MM)")]
    InvalidTime(String),
    #[display(fmt = "Unknown calendar: {_0} (expected umm-al-qura or tabular)")]
    UnknownCalendar(String),
    #[display(fmt = "Empty input")]
    EmptyInput,
}

impl std::error::Error for ParseError {}
