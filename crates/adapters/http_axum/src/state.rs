//! Shared application state for axum handlers.

use std::sync::Arc;

use tokio::sync::watch;

use roomwatch_app::ports::TransitionNotifier;
use roomwatch_app::sequencer::SequencerStatus;

/// Application state shared across all axum handlers.
///
/// Generic over the notifier receiving inbound `room` events. `Clone` is
/// implemented manually so `T` itself does not need to be `Clone`.
pub struct AppState<T> {
    /// Receives every accepted `room` event.
    pub trigger: Arc<T>,
    /// Latest sequencer status.
    pub status: watch::Receiver<SequencerStatus>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            trigger: Arc::clone(&self.trigger),
            status: self.status.clone(),
        }
    }
}

impl<T> AppState<T>
where
    T: TransitionNotifier + Sync,
{
    pub fn new(trigger: T, status: watch::Receiver<SequencerStatus>) -> Self {
        Self {
            trigger: Arc::new(trigger),
            status,
        }
    }
}
