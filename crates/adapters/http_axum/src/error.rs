//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use roomwatch_domain::error::RoomwatchError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`RoomwatchError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(RoomwatchError);

impl From<RoomwatchError> for ApiError {
    fn from(err: RoomwatchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RoomwatchError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            RoomwatchError::Delivery(err) => {
                tracing::warn!(error = %err, "trigger rejected");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "automation sequencer unavailable".to_string(),
                )
            }
            err => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use roomwatch_domain::error::ValidationError;

    use super::*;

    #[test]
    fn should_map_validation_to_bad_request() {
        let response = ApiError::from(RoomwatchError::from(ValidationError::InvalidPresenceValue(
            "maybe".to_string(),
        )))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn should_map_delivery_to_service_unavailable() {
        let response = ApiError::from(RoomwatchError::delivery("queue full")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn should_hide_internal_errors() {
        let response = ApiError::from(RoomwatchError::command("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
