//! Sequencer status snapshot.

use axum::Json;
use axum::extract::State;

use roomwatch_app::ports::TransitionNotifier;
use roomwatch_app::sequencer::SequencerStatus;

use crate::state::AppState;

/// `GET /api/status`: phase, last trigger and outcome of the sequencer.
pub async fn get<T>(State(state): State<AppState<T>>) -> Json<SequencerStatus>
where
    T: TransitionNotifier + Sync,
{
    Json(state.status.borrow().clone())
}
