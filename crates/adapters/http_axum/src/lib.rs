//! # roomwatch-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Routes
//! - `GET  /health`: liveness probe
//! - `POST /api/webhook/room`: inbound `room` event, triggers the sequencer
//! - `GET  /api/status`: current sequencer status
//! - `GET  /api/status/stream`: status changes as Server-Sent Events
//!
//! ## Dependency rule
//! Depends on `roomwatch-app` (port traits, sequencer status) and
//! `roomwatch-domain` (payload types). Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
