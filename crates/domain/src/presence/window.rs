//! Window: one presence sample per elapsed second.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A fixed-length sequence of per-second presence samples.
///
/// Slot `i` holds the sample taken `i` whole seconds after the window
/// started. A window covering `time_window_secs` seconds has
/// `time_window_secs + 1` slots. A fresh window reads `false` everywhere
/// (nobody observed); [`Window::carry_forward`] fills seconds a slow
/// detector skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    slots: Vec<bool>,
}

impl Window {
    /// Create an empty window with `len` slots.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyWindow`] when `len` is zero.
    pub fn new(len: usize) -> Result<Self, ValidationError> {
        if len == 0 {
            return Err(ValidationError::EmptyWindow);
        }
        Ok(Self {
            slots: vec![false; len],
        })
    }

    /// Create a window sized for a time span of `time_window_secs` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyWindow`] if `time_window_secs + 1`
    /// does not fit in memory indices.
    pub fn for_time_window(time_window_secs: u64) -> Result<Self, ValidationError> {
        let len = usize::try_from(time_window_secs)
            .ok()
            .and_then(|secs| secs.checked_add(1))
            .ok_or(ValidationError::EmptyWindow)?;
        Self::new(len)
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`: a window cannot be built without slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the last slot.
    #[must_use]
    pub fn last_slot(&self) -> usize {
        self.slots.len() - 1
    }

    /// The elapsed time after which this window is complete.
    #[must_use]
    pub fn span(&self) -> Duration {
        Duration::from_secs(self.last_slot() as u64)
    }

    /// Record `sample` at `offset` whole seconds since the window began.
    ///
    /// Offsets past the end are clamped to the last slot. Returns the slot
    /// actually written.
    pub fn record(&mut self, offset: u64, sample: bool) -> usize {
        let last = self.last_slot();
        let slot = usize::try_from(offset).map_or(last, |offset| offset.min(last));
        self.slots[slot] = sample;
        slot
    }

    /// Write `sample` into every slot in `from..to`.
    ///
    /// Bounds are clamped to the window, so an empty or reversed range is a
    /// no-op.
    pub fn carry_forward(&mut self, from: usize, to: usize, sample: bool) {
        let to = to.min(self.slots.len());
        if from < to {
            self.slots[from..to].fill(sample);
        }
    }

    /// Read-only view of the samples.
    #[must_use]
    pub fn samples(&self) -> &[bool] {
        &self.slots
    }

    /// Count samples that disagree with `latched`.
    #[must_use]
    pub fn disagreeing(&self, latched: bool) -> usize {
        self.slots.iter().filter(|&&s| s != latched).count()
    }
}

impl TryFrom<Vec<bool>> for Window {
    type Error = ValidationError;

    fn try_from(slots: Vec<bool>) -> Result<Self, Self::Error> {
        if slots.is_empty() {
            return Err(ValidationError::EmptyWindow);
        }
        Ok(Self { slots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_zero_length() {
        assert_eq!(Window::new(0), Err(ValidationError::EmptyWindow));
    }

    #[test]
    fn should_size_window_as_time_window_plus_one() {
        let window = Window::for_time_window(5).unwrap();
        assert_eq!(window.len(), 6);
        assert_eq!(window.span(), Duration::from_secs(5));
    }

    #[test]
    fn should_start_with_every_slot_unobserved() {
        let window = Window::new(6).unwrap();
        assert!(window.samples().iter().all(|s| !s));
    }

    #[test]
    fn should_write_sample_at_elapsed_offset() {
        let mut window = Window::new(6).unwrap();
        assert_eq!(window.record(2, true), 2);
        assert_eq!(window.samples(), &[false, false, true, false, false, false]);
    }

    #[test]
    fn should_clamp_late_sample_into_last_slot() {
        let mut window = Window::new(6).unwrap();
        assert_eq!(window.record(9, true), 5);
        assert_eq!(window.samples(), &[false, false, false, false, false, true]);
    }

    #[test]
    fn should_overwrite_when_two_samples_share_a_second() {
        let mut window = Window::new(3).unwrap();
        window.record(1, true);
        window.record(1, false);
        assert_eq!(window.samples(), &[false, false, false]);
    }

    #[test]
    fn should_count_disagreeing_samples() {
        let window = Window::try_from(vec![true, true, false, true, false, false]).unwrap();
        assert_eq!(window.disagreeing(false), 3);
        assert_eq!(window.disagreeing(true), 3);
    }

    #[test]
    fn should_reject_empty_sample_vec() {
        assert_eq!(
            Window::try_from(Vec::new()),
            Err(ValidationError::EmptyWindow)
        );
    }

    #[test]
    fn should_carry_sample_into_skipped_slots() {
        let mut window = Window::new(6).unwrap();
        window.carry_forward(1, 4, true);
        assert_eq!(window.samples(), &[false, true, true, true, false, false]);
    }

    #[test]
    fn should_ignore_carry_range_outside_window() {
        let mut window = Window::new(3).unwrap();
        window.carry_forward(2, 10, true);
        window.carry_forward(2, 1, false);
        assert_eq!(window.samples(), &[false, false, true]);
    }
}
