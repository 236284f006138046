use std::fmt;

use chrono::{DateTime, TimeZone};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::calendar::{HijriCalendar, extract};
use crate::consts::{
    EID_AL_FITR_LABEL, MILLIS_PER_SECOND, RAMADAN_LABEL, SECONDS_PER_DAY, SECONDS_PER_HOUR,
    SECONDS_PER_MINUTE,
};
use crate::scan::find_next_match;
use crate::{HijriDate, HijriDay, HijriMonth};

/// Which countdown is active, derived from the Hijri month of "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Phase {
    /// Counting down to 1 Ramadan
    #[display(fmt = "outside Ramadan")]
    OutsideRamadan,
    /// Counting down to 1 Shawwal
    #[display(fmt = "in Ramadan")]
    InRamadan,
}

impl Phase {
    pub const fn of(hijri: &HijriDate) -> Self {
        if hijri.is_ramadan() {
            Self::InRamadan
        } else {
            Self::OutsideRamadan
        }
    }

    /// The Hijri month and day this phase counts down to
    pub const fn target(self) -> (HijriMonth, HijriDay) {
        match self {
            Self::OutsideRamadan => (HijriMonth::RAMADAN, HijriDay::first()),
            Self::InRamadan => (HijriMonth::SHAWWAL, HijriDay::first()),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OutsideRamadan => RAMADAN_LABEL,
            Self::InRamadan => EID_AL_FITR_LABEL,
        }
    }
}

/// A labelled countdown deadline.
///
/// `target` is `None` when the forward scan found no matching day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTarget<Tz: TimeZone> {
    pub phase: Phase,
    pub target: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> CountdownTarget<Tz> {
    pub const fn label(&self) -> &'static str {
        self.phase.label()
    }

    /// The Hijri month and day being counted down to
    pub const fn hijri_target(&self) -> (HijriMonth, HijriDay) {
        self.phase.target()
    }

    /// Evaluates this target against the given instant
    pub fn status_at<Tz2: TimeZone>(&self, now: &DateTime<Tz2>) -> CountdownStatus<Tz> {
        let label = self.label();
        let Some(target) = self.target.clone() else {
            return CountdownStatus::Unavailable { label };
        };

        if target.timestamp_millis() <= now.timestamp_millis() {
            CountdownStatus::Reached { label, target }
        } else {
            let remaining = remaining(now.timestamp_millis(), target.timestamp_millis());
            CountdownStatus::Running {
                label,
                target,
                remaining,
            }
        }
    }
}

/// Picks the countdown for `now`: Eid al-Fitr during Ramadan, Ramadan otherwise.
pub fn select_target<C, Tz>(calendar: &C, now: &DateTime<Tz>) -> CountdownTarget<Tz>
where
    C: HijriCalendar + ?Sized,
    Tz: TimeZone,
{
    let phase = Phase::of(&extract(calendar, now));
    let (month, day) = phase.target();

    CountdownTarget {
        phase,
        target: find_next_match(calendar, month, day, now),
    }
}

/// Whole-unit breakdown of the time left until a deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemainingTime {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl RemainingTime {
    pub const fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// Total whole seconds represented
    pub const fn total_seconds(&self) -> u64 {
        self.days * SECONDS_PER_DAY
            + self.hours as u64 * SECONDS_PER_HOUR
            + self.minutes as u64 * SECONDS_PER_MINUTE
            + self.seconds as u64
    }
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Time left from `now_millis` until `target_millis`, floored to whole seconds.
///
/// A target at or before `now` yields all zeros.
pub fn remaining(now_millis: i64, target_millis: i64) -> RemainingTime {
    let delta = target_millis.saturating_sub(now_millis).max(0);
    let total = u64::try_from(delta / MILLIS_PER_SECOND).unwrap_or(0);

    let within_day = total % SECONDS_PER_DAY;
    let within_hour = total % SECONDS_PER_HOUR;

    RemainingTime {
        days: total / SECONDS_PER_DAY,
        hours: narrow(within_day / SECONDS_PER_HOUR),
        minutes: narrow(within_hour / SECONDS_PER_MINUTE),
        seconds: narrow(total % SECONDS_PER_MINUTE),
    }
}

// Callers only pass values already reduced below 60 or 24.
fn narrow(value: u64) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

/// What the countdown view shows at a given instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownStatus<Tz: TimeZone> {
    Running {
        label: &'static str,
        target: DateTime<Tz>,
        remaining: RemainingTime,
    },
    /// The deadline has passed
    Reached {
        label: &'static str,
        target: DateTime<Tz>,
    },
    /// No deadline could be computed
    Unavailable { label: &'static str },
}

impl<Tz: TimeZone> CountdownStatus<Tz> {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Running { label, .. }
            | Self::Reached { label, .. }
            | Self::Unavailable { label } => *label,
        }
    }

    pub const fn target(&self) -> Option<&DateTime<Tz>> {
        match self {
            Self::Running { target, .. } | Self::Reached { target, .. } => Some(target),
            Self::Unavailable { .. } => None,
        }
    }

    /// Time left, zero once reached
    pub const fn remaining(&self) -> Option<RemainingTime> {
        match self {
            Self::Running { remaining, .. } => Some(*remaining),
            Self::Reached { .. } => Some(RemainingTime {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 0,
            }),
            Self::Unavailable { .. } => None,
        }
    }
}

impl<Tz: TimeZone> fmt::Display for CountdownStatus<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running {
                label,
                target,
                remaining,
            } => write!(
                f,
                "{label} ({}): {remaining}",
                target.format("%A, %-d %B %Y")
            ),
            Self::Reached { label, .. } => write!(f, "{label}: it's time!"),
            Self::Unavailable { .. } => {
                f.write_str("Countdown: unable to compute target date. Please try again.")
            }
        }
    }
}

/// Resolves the countdown for `now` and evaluates it in one step.
pub fn countdown_status<C, Tz>(calendar: &C, now: &DateTime<Tz>) -> CountdownStatus<Tz>
where
    C: HijriCalendar + ?Sized,
    Tz: TimeZone,
{
    select_target(calendar, now).status_at(now)
}
