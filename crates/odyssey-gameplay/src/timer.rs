//! Control timer for a mounted ride.
//!
//! Counts mounted time, warns once shortly before the limit, drives the fade
//! curve over the final second, and expires once.

use serde::{Deserialize, Serialize};

/// Seconds before the limit at which the warning fires.
pub const WARNING_LEAD: f32 = 1.0;

/// Length of the fade-out before expiry, in seconds.
pub const FADE_DURATION: f32 = 1.0;

/// Slack on threshold comparisons so float drift from summed ticks cannot
/// push a crossing into the next tick.
const TICK_EPSILON: f32 = 1e-4;

/// What happened during one timer advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerTick {
    /// Warning threshold crossed this tick
    pub warning: bool,
    /// Limit reached this tick
    pub expired: bool,
}

/// Read-only view of the timer for debugging tools.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerDiagnostics {
    /// Seconds counted in the current episode
    pub elapsed: f32,
    /// Configured limit
    pub limit: f32,
    /// Seconds left before expiry (never negative)
    pub remaining: f32,
    /// Whether the timer is counting
    pub active: bool,
}

/// Mounted-time counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlTimer {
    elapsed: f32,
    limit: f32,
    active: bool,
    warned: bool,
    expired: bool,
    fade_enabled: bool,
}

impl ControlTimer {
    /// Creates an idle timer.
    #[must_use]
    pub const fn new(limit: f32, fade_enabled: bool) -> Self {
        Self {
            elapsed: 0.0,
            limit,
            active: false,
            warned: false,
            expired: false,
            fade_enabled,
        }
    }

    /// Starts a new episode from zero.
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
        self.warned = false;
        self.expired = false;
    }

    /// Stops counting and clears elapsed time.
    pub fn stop(&mut self) {
        self.active = false;
        self.elapsed = 0.0;
    }

    /// Advances by `dt` seconds if active.
    ///
    /// The warning uses crossing detection latched per episode, so it fires
    /// exactly once whatever the tick lengths are, including when a single
    /// tick jumps over the whole warning window. Expiry stops the timer but
    /// keeps the elapsed time readable until the next `stop` or `start`.
    pub fn advance(&mut self, dt: f32) -> TimerTick {
        let mut tick = TimerTick::default();
        if !self.active {
            return tick;
        }

        self.elapsed += dt.max(0.0);

        if !self.warned && self.elapsed + TICK_EPSILON >= self.warning_threshold() {
            self.warned = true;
            tick.warning = true;
        }
        if !self.expired && self.elapsed + TICK_EPSILON >= self.limit {
            self.expired = true;
            self.active = false;
            tick.expired = true;
        }
        tick
    }

    /// Elapsed time at which the warning fires.
    #[must_use]
    pub fn warning_threshold(&self) -> f32 {
        (self.limit - WARNING_LEAD).max(0.0)
    }

    /// Opacity for the current elapsed time: 1.0 until the final second,
    /// then linear down to 0.0 at the limit.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        if !self.fade_enabled {
            return 1.0;
        }
        if self.elapsed + TICK_EPSILON >= self.limit {
            return 0.0;
        }
        let fade_start = self.limit - FADE_DURATION;
        let progress = ((self.elapsed - fade_start) / FADE_DURATION).clamp(0.0, 1.0);
        1.0 - progress
    }

    /// Returns elapsed seconds in the current episode.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Returns the configured limit.
    #[must_use]
    pub const fn limit(&self) -> f32 {
        self.limit
    }

    /// Changes the limit. Takes effect on the next advance.
    pub fn set_limit(&mut self, limit: f32) {
        self.limit = limit;
    }

    /// Returns whether the timer is counting.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns whether this episode has expired.
    #[must_use]
    pub const fn has_expired(&self) -> bool {
        self.expired
    }

    /// Returns whether fading is enabled.
    #[must_use]
    pub const fn fade_enabled(&self) -> bool {
        self.fade_enabled
    }

    /// Returns a diagnostic snapshot.
    #[must_use]
    pub fn diagnostics(&self) -> TimerDiagnostics {
        TimerDiagnostics {
            elapsed: self.elapsed,
            limit: self.limit,
            remaining: (self.limit - self.elapsed).max(0.0),
            active: self.active,
        }
    }
}
