//! Wait policies and the synchronous polling loop.
//!
//! All waits in Navegar are blocking: the calling thread polls a
//! condition at a fixed interval until it holds or the policy's timeout
//! ceiling elapses. A timed-out wait is never retried, only reported.
//!
//! The four named profiles (standard, short, long, fluent) are
//! constructors over a single [`WaitPolicy`] value object rather than
//! separate wait types; a fluent policy additionally names the
//! transient error classes it keeps polling through.

use std::time::{Duration, Instant};

use crate::result::{NavegarError, NavegarResult, TransientError};

/// Default wait ceiling (60 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Short wait ceiling (10 seconds)
pub const SHORT_TIMEOUT_MS: u64 = 10_000;

/// Long wait ceiling (120 seconds)
pub const LONG_TIMEOUT_MS: u64 = 120_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Polling interval used by the fluent profile (1 second)
pub const FLUENT_POLL_INTERVAL_MS: u64 = 1_000;

/// Timeout, poll interval, and ignored transient errors for one wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitPolicy {
    /// How long the wait may block in total
    pub timeout: Duration,
    /// How long to sleep between condition checks
    pub poll_interval: Duration,
    /// Transient error classes that keep the poll going
    pub ignored: Vec<TransientError>,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl WaitPolicy {
    /// The default profile: 60s ceiling, 500ms poll
    #[must_use]
    pub fn standard() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            ignored: Vec::new(),
        }
    }

    /// The short profile: 10s ceiling, 500ms poll
    #[must_use]
    pub fn short() -> Self {
        Self {
            timeout: Duration::from_millis(SHORT_TIMEOUT_MS),
            ..Self::standard()
        }
    }

    /// The long profile: 120s ceiling, 500ms poll
    #[must_use]
    pub fn long() -> Self {
        Self {
            timeout: Duration::from_millis(LONG_TIMEOUT_MS),
            ..Self::standard()
        }
    }

    /// The fluent profile: 60s ceiling, 1s poll, polls through
    /// not-yet-visible elements
    #[must_use]
    pub fn fluent() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(FLUENT_POLL_INTERVAL_MS),
            ignored: vec![TransientError::ElementNotVisible],
        }
    }

    /// Override the timeout ceiling
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Add a transient error class to poll through
    #[must_use]
    pub fn ignoring(mut self, kind: TransientError) -> Self {
        if !self.ignored.contains(&kind) {
            self.ignored.push(kind);
        }
        self
    }

    /// Timeout in whole milliseconds
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Poll `condition` under `policy` until it yields a value.
///
/// The condition is checked at least once, even with a zero timeout.
/// `Ok(None)` means "not yet"; errors whose transient class is in the
/// policy's ignore list also mean "not yet". Any other error aborts the
/// wait immediately.
///
/// # Errors
///
/// Returns [`NavegarError::Timeout`] naming `waiting_for` if the
/// ceiling elapses, or the condition's own error when it is not an
/// ignored transient.
pub fn until<T, F>(policy: &WaitPolicy, waiting_for: &str, mut condition: F) -> NavegarResult<T>
where
    F: FnMut() -> NavegarResult<Option<T>>,
{
    let start = Instant::now();
    loop {
        match condition() {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => match e.transient_kind() {
                Some(kind) if policy.ignored.contains(&kind) => {}
                _ => return Err(e),
            },
        }

        if start.elapsed() >= policy.timeout {
            return Err(NavegarError::Timeout {
                ms: policy.timeout_ms(),
                waiting_for: waiting_for.to_string(),
            });
        }
        std::thread::sleep(policy.poll_interval);
    }
}

/// Poll a boolean predicate under `policy`.
///
/// # Errors
///
/// Returns [`NavegarError::Timeout`] if the predicate never holds.
pub fn until_true<F>(policy: &WaitPolicy, waiting_for: &str, mut predicate: F) -> NavegarResult<()>
where
    F: FnMut() -> bool,
{
    until(policy, waiting_for, || Ok(predicate().then_some(())))
}
