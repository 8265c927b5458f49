//! # roomwatch-app
//!
//! Application layer: the presence pipeline, the automation sequencer and
//! **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `SampleSource`: one presence sample from the detector
//!   - `TransitionNotifier`: deliver a transition event across the network
//!   - `CommandBackend`: send device commands and select sources
//! - Run the **sampling side** on two OS threads joined by a bounded queue:
//!   `WindowAggregator` (producer) and `PresenceVoter` (consumer)
//! - Run the **automation side**: `AutomationSequencer` walks the
//!   [`AutomationPlan`](roomwatch_domain::sequence::AutomationPlan) for each
//!   trigger, one run at a time, newest trigger wins
//!
//! ## Dependency rule
//! Depends on `roomwatch-domain` only (plus `tokio` for the sequencer).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod aggregator;
pub mod pipeline;
pub mod ports;
pub mod sequencer;
pub mod voter;
