//! # roomwatch-adapter-virtual
//!
//! Simulated collaborators so the whole pipeline runs without hardware.
//!
//! | Piece | Port | Behaviour |
//! |-------|------|-----------|
//! | [`VirtualPresenceSensor`] | `SampleSource` | Replays a looping presence pattern |
//! | [`VirtualRemote`] | `CommandBackend` | Logs and records every command |
//!
//! ## Dependency rule
//!
//! Depends on `roomwatch-app` (port traits) and `roomwatch-domain` only.

mod remote;
mod sensor;

pub use remote::{RecordedCall, VirtualRemote};
pub use sensor::{PatternError, PresencePattern, VirtualPresenceSensor};
