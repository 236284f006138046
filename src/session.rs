//! The live countdown: a periodic task that samples a [`Clock`], keeps the
//! resolved target until the Ramadan phase flips, and publishes a fresh
//! [`CountdownStatus`] on every tick.

use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::calendar::{HijriCalendar, extract};
use crate::countdown::{CountdownStatus, CountdownTarget, Phase, select_target};

/// Shortest refresh period a session accepts
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(10);

/// Source of the current instant.
pub trait Clock: Send + 'static {
    type Tz: TimeZone;

    fn now(&self) -> DateTime<Self::Tz>;
}

/// Wall clock in the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcClock;

impl Clock for UtcClock {
    type Tz = Utc;

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Caches the resolved target and re-runs the forward scan only when the
/// phase derived from "now" differs from the cached one.
#[derive(Debug)]
pub struct TargetTracker<C, Tz: TimeZone> {
    calendar: C,
    current: Option<CountdownTarget<Tz>>,
    resolutions: u64,
}

impl<C: HijriCalendar, Tz: TimeZone> TargetTracker<C, Tz> {
    pub const fn new(calendar: C) -> Self {
        Self {
            calendar,
            current: None,
            resolutions: 0,
        }
    }

    /// Status at `now`, resolving a new target if the phase changed
    pub fn status(&mut self, now: &DateTime<Tz>) -> CountdownStatus<Tz> {
        let phase = Phase::of(&extract(&self.calendar, now));

        let target = match self.current.take() {
            Some(cached) if cached.phase == phase => cached,
            previous => {
                let resolved = select_target(&self.calendar, now);
                self.resolutions += 1;
                match &previous {
                    Some(old) => {
                        info!(from = %old.phase, to = %resolved.phase, "countdown phase changed");
                    }
                    None => debug!(phase = %resolved.phase, "countdown target resolved"),
                }
                resolved
            }
        };

        let status = target.status_at(now);
        self.current = Some(target);
        status
    }

    /// Number of forward scans performed so far
    pub const fn resolutions(&self) -> u64 {
        self.resolutions
    }

    pub const fn target(&self) -> Option<&CountdownTarget<Tz>> {
        self.current.as_ref()
    }
}

/// A running countdown bound to the lifetime of this handle.
///
/// The periodic task is aborted by [`CountdownSession::stop`] or when the
/// handle is dropped, whichever comes first.
#[derive(Debug)]
pub struct CountdownSession<Tz: TimeZone> {
    status: watch::Receiver<CountdownStatus<Tz>>,
    task: Option<JoinHandle<()>>,
}

impl<Tz> CountdownSession<Tz>
where
    Tz: TimeZone + Send + Sync + 'static,
    Tz::Offset: Send + Sync,
{
    /// Computes the first status immediately, then spawns a task that
    /// refreshes it every `period`.
    ///
    /// Periods shorter than [`MIN_TICK_PERIOD`] are raised to it.
    /// Must be called from within a tokio runtime.
    pub fn start<C, K>(calendar: C, clock: K, period: Duration) -> Self
    where
        C: HijriCalendar + Send + 'static,
        K: Clock<Tz = Tz>,
    {
        if period < MIN_TICK_PERIOD {
            warn!(?period, minimum = ?MIN_TICK_PERIOD, "countdown period too short, clamping");
        }
        let period = period.max(MIN_TICK_PERIOD);

        let mut tracker = TargetTracker::new(calendar);
        let (tx, rx) = watch::channel(tracker.status(&clock.now()));

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately and the initial status is already published
            interval.tick().await;

            loop {
                interval.tick().await;
                let status = tracker.status(&clock.now());
                if tx.send(status).is_err() {
                    debug!("countdown has no subscribers, stopping");
                    break;
                }
            }
        });

        info!(?period, "countdown started");
        Self {
            status: rx,
            task: Some(task),
        }
    }

    /// A receiver notified after every tick
    pub fn subscribe(&self) -> watch::Receiver<CountdownStatus<Tz>> {
        self.status.clone()
    }

    /// The most recently published status
    pub fn current(&self) -> CountdownStatus<Tz> {
        self.status.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the periodic task and releases the handle
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("countdown stopped");
        }
    }
}

impl<Tz: TimeZone> Drop for CountdownSession<Tz> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
