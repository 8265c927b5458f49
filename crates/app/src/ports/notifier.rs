//! Transition notifier port: hands a transition event to the automation side.

use std::sync::Arc;

use roomwatch_domain::error::RoomwatchError;
use roomwatch_domain::presence::TransitionEvent;

/// Delivers a [`TransitionEvent`] across the automation boundary.
///
/// Called from the voter thread, once per transition. Implementations must
/// not retry: the voter logs a failure and carries on.
pub trait TransitionNotifier: Send + 'static {
    /// Deliver one event.
    ///
    /// # Errors
    ///
    /// Returns [`RoomwatchError::Delivery`] when the event did not reach
    /// its destination.
    fn notify(&self, event: &TransitionEvent) -> Result<(), RoomwatchError>;
}

impl<T: TransitionNotifier + Sync> TransitionNotifier for Arc<T> {
    fn notify(&self, event: &TransitionEvent) -> Result<(), RoomwatchError> {
        (**self).notify(event)
    }
}
