//! Home Assistant adapter error types.

use roomwatch_domain::error::RoomwatchError;

/// Errors specific to the Home Assistant backend.
#[derive(Debug, thiserror::Error)]
pub enum HomeAssistantError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request never got a response.
    #[error("request to {endpoint} failed")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The token was missing or rejected.
    #[error("Home Assistant rejected the access token")]
    Unauthorized,

    /// Home Assistant answered with a non-success status.
    #[error("{endpoint} answered with status {status}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
}

impl HomeAssistantError {
    /// Convert into a [`RoomwatchError::Command`] for propagation across
    /// port boundaries.
    pub fn into_domain(self) -> RoomwatchError {
        RoomwatchError::Command(Box::new(self))
    }
}

impl From<HomeAssistantError> for RoomwatchError {
    fn from(err: HomeAssistantError) -> Self {
        err.into_domain()
    }
}
