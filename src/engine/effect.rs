//! Lifecycle state for `Effect`-tagged components.
//!
//! Effects are components that linger across frames until something expires
//! them: either a system marks them for cleanup, or an embedded timer runs
//! out. [`EffectState`] is the little record effect components embed to get
//! both, and the frame loop sweeps expired effects with
//! `remove(|e| e.state.is_expired())` followed by a prune.

use std::time::{Duration, Instant};


/// Countdown started at construction time.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    started: Instant,
    duration: Duration,
}

impl Timer {
    /// Starts a timer lasting `duration`.
    pub fn new(duration: Duration) -> Self {
        Self { started: Instant::now(), duration }
    }

    /// Returns `true` once the duration has passed.
    pub fn has_elapsed(&self) -> bool {
        self.started.elapsed() >= self.duration
    }

    /// Restarts the countdown from now.
    pub fn restart(&mut self) {
        self.started = Instant::now();
    }
}

/// Cleanup flag and optional expiry timer for an effect component.
#[derive(Debug, Clone, Default)]
pub struct EffectState {
    /// Set by systems to expire the effect on the next sweep.
    pub cleanup: bool,

    /// Optional countdown; an elapsed timer expires the effect.
    pub timer: Option<Timer>,
}

impl EffectState {
    /// An effect with no timer; it lives until marked for cleanup.
    pub fn new() -> Self {
        Self::default()
    }

    /// An effect that expires after `duration`.
    pub fn with_timer(duration: Duration) -> Self {
        Self { cleanup: false, timer: Some(Timer::new(duration)) }
    }

    /// Flags the effect for removal on the next sweep.
    pub fn mark_for_cleanup(&mut self) {
        self.cleanup = true;
    }

    /// Returns `true` if the effect is marked for cleanup or its timer has
    /// elapsed.
    pub fn is_expired(&self) -> bool {
        if self.cleanup {
            return true;
        }
        self.timer.as_ref().is_some_and(Timer::has_elapsed)
    }
}
