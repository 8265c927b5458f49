//! Server-Sent Events stream of sequencer status.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

use roomwatch_app::ports::TransitionNotifier;

use crate::state::AppState;

/// `GET /api/status/stream`: SSE stream of sequencer status.
///
/// The current status is sent immediately, then one `data:` frame per
/// change. Intermediate values may be skipped when a client reads slowly;
/// the latest status is always delivered.
pub async fn stream<T>(
    State(state): State<AppState<T>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    T: TransitionNotifier + Sync,
{
    let updates = WatchStream::new(state.status.clone()).filter_map(|status| {
        match serde_json::to_string(&status) {
            Ok(json) => Some(Ok(Event::default().event("status").data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize status for SSE stream");
                None
            }
        }
    });

    Sse::new(updates).keep_alive(KeepAlive::default())
}
