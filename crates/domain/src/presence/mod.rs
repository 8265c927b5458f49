//! Presence: from per-second samples to a latched "person in room" state.
//!
//! A [`Window`] collects one sample per elapsed second. When it is complete
//! the [`HysteresisVote`] decides whether it carries enough disagreement to
//! flip the [`PresenceState`]; each flip produces exactly one
//! [`TransitionEvent`].

mod state;
mod vote;
mod window;

pub use state::{PresenceState, TransitionEvent};
pub use vote::{DEFAULT_THRESHOLD, HysteresisVote};
pub use window::Window;

/// Default window span in seconds (window length is this plus one).
pub const DEFAULT_TIME_WINDOW_SECS: u64 = 5;
