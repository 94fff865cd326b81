//! Debounced auto-save timer.
//!
//! A single cancellable deadline per editor session. Every mutation restarts
//! it; the session polls [`AutoSaveTimer::take_due`] from its tick and saves
//! once the quiet period has elapsed. Times are passed in by the caller so the
//! timer itself never reads the clock.

use std::time::Duration;
use web_time::Instant;

use crate::constants::DEFAULT_AUTO_SAVE_DELAY_MS;

/// Manages auto-save timing with debouncing.
#[derive(Debug, Clone)]
pub struct AutoSaveTimer {
    /// Quiet period after the last change before saving.
    delay: Duration,

    /// When the pending save fires. `None` when nothing is scheduled.
    deadline: Option<Instant>,

    /// Whether auto-save is enabled.
    enabled: bool,
}

impl AutoSaveTimer {
    /// Default debounce delay (3 seconds).
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(DEFAULT_AUTO_SAVE_DELAY_MS);

    /// Create a new timer with the default delay.
    pub fn new() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
            deadline: None,
            enabled: true,
        }
    }

    /// Create a disabled timer.
    pub fn disabled() -> Self {
        let mut timer = Self::new();
        timer.enabled = false;
        timer
    }

    /// Set the debounce delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)start the timer after a change at `now`. Replaces any pending deadline.
    pub fn schedule(&mut self, now: Instant) {
        if !self.enabled {
            return;
        }
        self.deadline = Some(now + self.delay);
        log::trace!("Auto-save: scheduled in {:?}", self.delay);
    }

    /// Drop the pending deadline, if any.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            log::trace!("Auto-save: cancelled");
        }
    }

    /// Whether a save is scheduled.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending save fires.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the pending deadline has passed at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Consume the deadline if it has passed. Returns true exactly once per
    /// scheduled save.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Set whether auto-save is enabled. Disabling cancels a pending save.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel();
        }
        log::debug!("Auto-save: enabled = {}", enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for AutoSaveTimer {
    fn default() -> Self {
        Self::new()
    }
}
