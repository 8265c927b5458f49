//! # roomwatch-domain
//!
//! Pure domain model for the roomwatch presence automation.
//!
//! ## Responsibilities
//! - Foundational types: typed run identifiers, error conventions, timestamps
//! - Define **Windows** (one presence sample per elapsed second)
//! - Define the **hysteresis vote** that turns windows into a latched
//!   [`PresenceState`](presence::PresenceState)
//! - Define **Transition events** and the `room` payload they travel as
//! - Define the closed set of **device commands** and the **automation plan**
//!   (ordered, delay-separated command steps) run on each transition
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod presence;
pub mod room_event;
pub mod sequence;
pub mod streaming;
