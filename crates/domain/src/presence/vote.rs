//! Hysteresis vote: decides whether a completed window flips the latched state.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::presence::Window;

/// Default fraction of a window that must disagree before a flip.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Majority-with-hysteresis rule.
///
/// A window flips the latched state only when strictly more than
/// `len * threshold` of its samples disagree with it. For a 6-slot window
/// at `0.7` that means at least 5 disagreeing samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HysteresisVote {
    threshold: f64,
}

impl Default for HysteresisVote {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl HysteresisVote {
    /// Build a rule with a custom threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ThresholdOutOfRange`] unless
    /// `0 < threshold < 1`.
    pub fn new(threshold: f64) -> Result<Self, ValidationError> {
        if threshold > 0.0 && threshold < 1.0 {
            Ok(Self { threshold })
        } else {
            Err(ValidationError::ThresholdOutOfRange(threshold))
        }
    }

    /// The configured threshold fraction.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether `window` carries enough disagreement to flip `latched`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn should_flip(&self, window: &Window, latched: bool) -> bool {
        let disagreeing = window.disagreeing(latched) as f64;
        disagreeing > window.len() as f64 * self.threshold
    }
}
