//! Interval timer driving autonomous playback.
//!
//! The clock only knows timing. Whoever supplies `on_tick` decides when the
//! domain has run out of steps and asks the owner to stop the clock.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::ValidationError;

/// Delay between playback steps, always a positive number of milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlaybackSpeed(Duration);

impl PlaybackSpeed {
    pub const DEFAULT_MILLIS: u64 = 1_000;

    pub fn from_millis(millis: u64) -> Result<Self, ValidationError> {
        if millis == 0 {
            return Err(ValidationError::InvalidSpeed {
                value: millis.to_string(),
            });
        }
        Ok(Self(Duration::from_millis(millis)))
    }

    pub const fn interval(self) -> Duration {
        self.0
    }

    pub fn as_millis(self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self(Duration::from_millis(Self::DEFAULT_MILLIS))
    }
}

impl FromStr for PlaybackSpeed {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidSpeed {
            value: value.to_owned(),
        };
        let trimmed = value.trim();
        let digits = trimmed.strip_suffix("ms").unwrap_or(trimmed).trim();
        let millis = digits.parse::<u64>().map_err(|_| invalid())?;
        Self::from_millis(millis).map_err(|_| invalid())
    }
}

impl Display for PlaybackSpeed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.as_millis())
    }
}

/// Cancellable repeating timer owning at most one live task.
///
/// Must be started from inside a tokio runtime. Dropping the clock stops it.
#[derive(Debug, Default)]
pub struct PlaybackClock {
    task: Option<JoinHandle<()>>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires `on_tick` every `period`, first one full period after the call.
    ///
    /// Returns `false` and leaves the running timer untouched when the clock
    /// is already running.
    pub fn start<F>(&mut self, period: Duration, mut on_tick: F) -> bool
    where
        F: FnMut() + Send + 'static,
    {
        if self.is_running() {
            return false;
        }

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                on_tick();
            }
        });
        self.task = Some(task);
        true
    }

    /// Releases the timer. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for PlaybackClock {
    fn drop(&mut self) {
        self.stop();
    }
}
