//! Webhook adapter error types.

use roomwatch_domain::error::RoomwatchError;

/// Errors specific to webhook delivery.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request never got a response (DNS, connect, timeout).
    #[error("webhook request failed")]
    Request(#[source] reqwest::Error),

    /// The receiver answered with a non-success status.
    #[error("webhook answered with status {status}")]
    Status { status: u16, body: String },
}

impl WebhookError {
    /// Convert into a [`RoomwatchError::Delivery`] for propagation across
    /// port boundaries.
    pub fn into_domain(self) -> RoomwatchError {
        RoomwatchError::Delivery(Box::new(self))
    }
}

impl From<WebhookError> for RoomwatchError {
    fn from(err: WebhookError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_status_error() {
        let err = WebhookError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "webhook answered with status 503");
    }

    #[test]
    fn should_convert_to_delivery_error() {
        let err: RoomwatchError = WebhookError::Status {
            status: 404,
            body: String::new(),
        }
        .into();
        assert!(matches!(err, RoomwatchError::Delivery(_)));
    }
}
