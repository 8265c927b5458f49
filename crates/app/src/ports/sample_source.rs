//! Sample source port: the opaque presence detector.

use roomwatch_domain::error::RoomwatchError;

/// Produces one presence sample per call.
///
/// Implementations capture a frame (or read a sensor) and report whether a
/// person was detected. Calls may block for roughly one frame period; they
/// run on the dedicated aggregator thread, never on an async runtime.
pub trait SampleSource: Send + 'static {
    /// Capture and classify one frame.
    ///
    /// # Errors
    ///
    /// Returns [`RoomwatchError::Sampling`] when the frame could not be
    /// captured. The caller skips the cycle and tries again.
    fn sample(&mut self) -> Result<bool, RoomwatchError>;
}

impl<T: SampleSource + ?Sized> SampleSource for Box<T> {
    fn sample(&mut self) -> Result<bool, RoomwatchError> {
        (**self).sample()
    }
}
