//! Presence voter: consumes completed windows and latches presence.

use std::sync::mpsc::Receiver;

use roomwatch_domain::presence::{HysteresisVote, PresenceState, TransitionEvent, Window};

use crate::pipeline::WindowMessage;
use crate::ports::TransitionNotifier;

/// Owns the latched [`PresenceState`] and notifies on every flip.
pub struct PresenceVoter<N> {
    state: PresenceState,
    vote: HysteresisVote,
    notifier: N,
}

impl<N: TransitionNotifier> PresenceVoter<N> {
    /// Create a voter starting from "nobody in the room".
    pub fn new(vote: HysteresisVote, notifier: N) -> Self {
        Self {
            state: PresenceState::default(),
            vote,
            notifier,
        }
    }

    /// Current latched state.
    #[must_use]
    pub fn state(&self) -> PresenceState {
        self.state
    }

    /// Apply one window.
    ///
    /// On a flip the event is handed to the notifier; a delivery failure is
    /// logged and otherwise ignored. Returns the emitted event, if any.
    pub fn evaluate(&mut self, window: &Window) -> Option<TransitionEvent> {
        let latched = self.state.in_room;
        tracing::debug!(
            latched,
            disagreeing = window.disagreeing(latched),
            len = window.len(),
            "window evaluated"
        );

        let event = self.state.apply(&self.vote, window)?;
        tracing::info!(person_in_room = event.person_in_room, "presence changed");

        if let Err(err) = self.notifier.notify(&event) {
            tracing::warn!(
                error = %err,
                person_in_room = event.person_in_room,
                "failed to deliver transition"
            );
        }
        Some(event)
    }

    /// Block on `queue` until a [`WindowMessage::Stop`] arrives or every
    /// sender is gone. Returns the final latched state.
    pub fn run(mut self, queue: &Receiver<WindowMessage>) -> PresenceState {
        while let Ok(message) = queue.recv() {
            match message {
                WindowMessage::Window(window) => {
                    self.evaluate(&window);
                }
                WindowMessage::Stop => break,
            }
        }
        tracing::debug!(in_room = self.state.in_room, "voter stopped");
        self.state
    }
}
