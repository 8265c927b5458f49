//! Window aggregator: turns a stream of samples into completed windows.
//!
//! The aggregator keeps exactly one open [`Window`]. Each sample lands in the
//! slot matching the whole seconds elapsed since the window opened; once the
//! elapsed time reaches the window span the window is returned and a fresh
//! one opens at that instant.
//!
//! A detector slower than one frame per second skips seconds. Skipped slots
//! repeat the previous sample, and the sample closing a window also opens
//! the next one at slot 0.

use std::time::Instant;

use roomwatch_domain::error::ValidationError;
use roomwatch_domain::presence::Window;

/// Accumulates samples into fixed-length windows.
#[derive(Debug)]
pub struct WindowAggregator {
    blank: Window,
    current: Window,
    opened_at: Instant,
    /// Last written slot of `current` and the sample stored there.
    last: Option<(usize, bool)>,
}

impl WindowAggregator {
    /// Create an aggregator whose first window opens at `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the window length overflows.
    pub fn new(time_window_secs: u64, now: Instant) -> Result<Self, ValidationError> {
        let blank = Window::for_time_window(time_window_secs)?;
        Ok(Self {
            current: blank.clone(),
            blank,
            opened_at: now,
            last: None,
        })
    }

    /// The window currently being filled.
    #[must_use]
    pub fn current(&self) -> &Window {
        &self.current
    }

    /// Record `sample` observed at `now`.
    ///
    /// Returns the completed window when `now` is at or past the window
    /// span. Samples arriving late (slow frame capture) are clamped into
    /// the last slot.
    pub fn push(&mut self, now: Instant, sample: bool) -> Option<Window> {
        let elapsed = now.saturating_duration_since(self.opened_at).as_secs();
        let slot = self.current.record(elapsed, sample);
        if let Some((prev_slot, prev)) = self.last {
            self.current.carry_forward(prev_slot + 1, slot, prev);
        }
        self.last = Some((slot, sample));
        tracing::trace!(elapsed, slot, sample, "sample recorded");

        if elapsed < self.current.span().as_secs() {
            return None;
        }

        self.opened_at = now;
        let mut next = self.blank.clone();
        next.record(0, sample);
        self.last = Some((0, sample));
        Some(std::mem::replace(&mut self.current, next))
    }
}
