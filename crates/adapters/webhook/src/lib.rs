//! # roomwatch-adapter-webhook
//!
//! Delivers presence transitions to a home-automation webhook.
//!
//! Every [`TransitionEvent`](roomwatch_domain::presence::TransitionEvent) is
//! POSTed as a `room` event body:
//!
//! ```json
//! {"person_in_room": "true"}
//! ```
//!
//! The flag is string-encoded to match what the receiving automation
//! templates expect.

pub mod config;
pub mod error;
pub mod notifier;

pub use config::WebhookConfig;
pub use error::WebhookError;
pub use notifier::WebhookNotifier;
