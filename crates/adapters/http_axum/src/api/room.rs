//! Inbound `room` webhook.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use roomwatch_app::ports::TransitionNotifier;
use roomwatch_domain::presence::TransitionEvent;
use roomwatch_domain::room_event::{ROOM_EVENT, RoomPayload};
use roomwatch_domain::time::now;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the webhook endpoint.
pub enum ReceiveResponse {
    Accepted(Json<RoomPayload>),
}

impl IntoResponse for ReceiveResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted(json) => (StatusCode::ACCEPTED, json).into_response(),
        }
    }
}

/// `POST /api/webhook/room`: hand a presence change to the sequencer.
///
/// The flag may be a JSON boolean or a `"true"`/`"false"` string. The run
/// itself happens in the background; the response only confirms the trigger
/// was queued.
pub async fn receive<T>(
    State(state): State<AppState<T>>,
    Json(payload): Json<RoomPayload>,
) -> Result<ReceiveResponse, ApiError>
where
    T: TransitionNotifier + Sync,
{
    tracing::info!(
        event = ROOM_EVENT,
        person_in_room = payload.person_in_room,
        "room event received"
    );
    let event = TransitionEvent {
        person_in_room: payload.person_in_room,
        emitted_at: now(),
    };
    state.trigger.notify(&event)?;
    Ok(ReceiveResponse::Accepted(Json(payload)))
}
