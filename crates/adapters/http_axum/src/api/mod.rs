//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod room;
pub mod sse;
pub mod status;

use axum::Router;
use axum::routing::{get, post};

use roomwatch_app::ports::TransitionNotifier;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<T>() -> Router<AppState<T>>
where
    T: TransitionNotifier + Sync,
{
    Router::new()
        .route("/webhook/room", post(room::receive::<T>))
        .route("/status", get(status::get::<T>))
        .route("/status/stream", get(sse::stream::<T>))
}
