//! Elapsed-time bookkeeping for a resource.
//!
//! The position is the time accumulated while output was running plus the
//! span since it last resumed. Every operation takes the current instant so
//! the arithmetic can be checked without an output device.

use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(super) struct PlayClock {
    accumulated: Duration,
    // Set while output is running.
    started_at: Option<Instant>,
}

impl PlayClock {
    pub(super) fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Position as of the last pause or seek.
    pub(super) fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub(super) fn start_at(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Stop running and fold the running span into the position.
    pub(super) fn pause_at(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated = self
                .accumulated
                .saturating_add(now.saturating_duration_since(st));
        }
    }

    /// Jump to `position`, keeping the running/stopped status.
    pub(super) fn seek_at(&mut self, position: Duration, now: Instant) {
        self.accumulated = position;
        if self.started_at.is_some() {
            self.started_at = Some(now);
        }
    }

    /// Current position, never past `limit` when one is known.
    pub(super) fn elapsed_at(&self, now: Instant, limit: Option<Duration>) -> Duration {
        let running = self
            .started_at
            .map_or(Duration::ZERO, |st| now.saturating_duration_since(st));
        let elapsed = self.accumulated.saturating_add(running);
        match limit {
            Some(total) => elapsed.min(total),
            None => elapsed,
        }
    }
}

/// Convert a seek target in seconds to a position, capped at `limit`.
///
/// Negative or non-finite input maps to zero; values too large for a
/// `Duration` saturate instead of panicking.
pub(super) fn position_from_secs(seconds: f64, limit: Option<Duration>) -> Duration {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let position = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX);
    match limit {
        Some(total) => position.min(total),
        None => position,
    }
}
