//! Latched presence state and the transition events it emits.

use serde::{Deserialize, Serialize};

use crate::presence::{HysteresisVote, Window};
use crate::time::{Timestamp, now};

/// The latched "person currently in room" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceState {
    pub in_room: bool,
    pub last_changed: Timestamp,
}

impl Default for PresenceState {
    fn default() -> Self {
        Self {
            in_room: false,
            last_changed: now(),
        }
    }
}

impl PresenceState {
    /// Apply one completed window.
    ///
    /// Flips the latched flag and returns the resulting event when `vote`
    /// accepts the window, otherwise leaves the state untouched.
    pub fn apply(&mut self, vote: &HysteresisVote, window: &Window) -> Option<TransitionEvent> {
        if !vote.should_flip(window, self.in_room) {
            return None;
        }
        let at = now();
        self.in_room = !self.in_room;
        self.last_changed = at;
        Some(TransitionEvent {
            person_in_room: self.in_room,
            emitted_at: at,
        })
    }
}

/// Emitted once per confirmed flip of [`PresenceState`].
///
/// Carries no identity beyond its payload, so redelivering the same value
/// is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub person_in_room: bool,
    pub emitted_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: bool = true;
    const F: bool = false;

    #[test]
    fn should_start_absent() {
        assert!(!PresenceState::default().in_room);
    }

    #[test]
    fn should_emit_one_event_on_flip() {
        let mut state = PresenceState::default();
        let before = state.last_changed;
        let window = Window::try_from(vec![T, T, T, T, T, F]).unwrap();
        let event = state.apply(&HysteresisVote::default(), &window).unwrap();
        assert!(event.person_in_room);
        assert!(state.in_room);
        assert!(state.last_changed >= before);
        assert_eq!(state.last_changed, event.emitted_at);
    }

    #[test]
    fn should_not_reemit_for_repeated_identical_windows() {
        let mut state = PresenceState::default();
        let vote = HysteresisVote::default();
        let window = Window::try_from(vec![T; 6]).unwrap();
        assert!(state.apply(&vote, &window).is_some());
        assert!(state.apply(&vote, &window).is_none());
        assert!(state.apply(&vote, &window).is_none());
        assert!(state.in_room);
    }

    #[test]
    fn should_keep_state_when_windows_stay_below_threshold() {
        let mut state = PresenceState::default();
        let vote = HysteresisVote::default();
        let changed = state.last_changed;
        let window = Window::try_from(vec![T, T, T, T, F, F]).unwrap();
        assert!(state.apply(&vote, &window).is_none());
        assert!(state.apply(&vote, &window).is_none());
        assert!(!state.in_room);
        assert_eq!(state.last_changed, changed);
    }
}
