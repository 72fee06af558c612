//! Bounded poll-until-stable waiting.
//!
//! Actuating a control (revealing diagram source, opening the artifact panel)
//! makes the page re-render asynchronously. Instead of sleeping for a flat
//! delay, the caller polls a fingerprint of the affected region and stops as
//! soon as two consecutive readings agree, or when `max_wait` runs out.

use std::time::{Duration, Instant};

/// How long to wait for a region to stop changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    /// Pause between two fingerprint readings.
    ///
    /// Default: 100 ms
    pub interval: Duration,

    /// Upper bound on the total wait, equal to the flat delay used by the
    /// browser integration.
    ///
    /// Default: 500 ms
    pub max_wait: Duration,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            max_wait: Duration::from_millis(500),
        }
    }
}

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Waiting is disabled.
    Skipped,
    /// Two consecutive readings agreed after `polls` readings.
    Stable { polls: usize },
    /// `max_wait` elapsed while the region was still changing.
    TimedOut { polls: usize },
}

impl SettlePolicy {
    /// Never wait. Used for static snapshots and tests.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            interval: Duration::ZERO,
            max_wait: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.max_wait.is_zero()
    }

    /// Poll `probe` until it returns the same value twice in a row.
    ///
    /// The first reading is taken immediately; every later reading follows a
    /// sleep of `interval`, clamped so the total never exceeds `max_wait`.
    pub fn wait_until_stable<F>(&self, mut probe: F) -> Settled
    where
        F: FnMut() -> u64,
    {
        if self.is_disabled() {
            return Settled::Skipped;
        }

        let deadline = Instant::now() + self.max_wait;
        let mut previous = probe();
        let mut polls = 1;

        loop {
            let now = Instant::now();
            if now >= deadline {
                tracing::debug!(polls, "settle wait timed out");
                return Settled::TimedOut { polls };
            }
            std::thread::sleep(self.interval.min(deadline - now));

            let current = probe();
            polls += 1;
            if current == previous {
                return Settled::Stable { polls };
            }
            previous = current;
        }
    }
}
