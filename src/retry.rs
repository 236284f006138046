use std::fmt::Display;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::consts::{RETRY_BASE_DELAY_MS, RETRY_MAX_ATTEMPTS};

/// Exponential backoff: the wait after the n-th failed attempt (0-based) is
/// `base * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base: Duration,
    pub max_attempts: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(RETRY_BASE_DELAY_MS),
            max_attempts: RETRY_MAX_ATTEMPTS,
        }
    }
}

impl Backoff {
    pub const fn new(base: Duration, max_attempts: u32) -> Self {
        Self { base, max_attempts }
    }

    /// Wait before retrying after failed attempt `attempt` (0-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base.saturating_mul(2_u32.saturating_pow(attempt))
    }
}

/// Classifies an error as worth retrying.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// Why a retried operation gave up.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// Every attempt failed with a transient error.
    #[error("gave up after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: E,
    },

    /// The operation failed in a way retrying cannot fix.
    #[error(transparent)]
    Terminal(E),
}

impl<E> RetryError<E> {
    /// The error from the final attempt
    pub fn into_inner(self) -> E {
        match self {
            Self::Exhausted { source, .. } | Self::Terminal(source) => source,
        }
    }
}

/// Runs `op` until it succeeds, fails terminally, or runs out of attempts.
///
/// `op` receives the 0-based attempt number. At least one attempt is always
/// made.
///
/// # Errors
/// Returns `RetryError::Terminal` on the first non-transient error, or
/// `RetryError::Exhausted` with the last error once `max_attempts` transient
/// failures have occurred.
pub async fn retry<T, E, F, Fut>(backoff: Backoff, mut op: F) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + Display,
{
    let attempts = backoff.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_transient() => return Err(RetryError::Terminal(e)),
            Err(e) if attempt + 1 >= attempts => {
                warn!(attempts, error = %e, "giving up");
                return Err(RetryError::Exhausted { attempts, source: e });
            }
            Err(e) => {
                let wait = backoff.delay(attempt);
                warn!(attempt = attempt + 1, ?wait, error = %e, "transient failure, retrying");
                sleep(wait).await;
                attempt += 1;
            }
        }
    }
}
