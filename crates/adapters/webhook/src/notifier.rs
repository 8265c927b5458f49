//! [`TransitionNotifier`] that POSTs each transition to a webhook.

use reqwest::Client;
use tokio::runtime::Handle;

use roomwatch_app::ports::TransitionNotifier;
use roomwatch_domain::error::RoomwatchError;
use roomwatch_domain::presence::TransitionEvent;
use roomwatch_domain::room_event::{ROOM_EVENT, RoomPayload};

use crate::config::WebhookConfig;
use crate::error::WebhookError;

/// Sends `room` events to the configured webhook URL.
///
/// [`TransitionNotifier::notify`] is called from the voter thread, so the
/// request is driven to completion on `runtime` while that thread blocks.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: Client,
    url: String,
    runtime: Handle,
}

impl WebhookNotifier {
    /// Build a notifier whose requests run on `runtime`.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &WebhookConfig, runtime: Handle) -> Result<Self, WebhookError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(WebhookError::Client)?;
        Ok(Self {
            http,
            url: config.url.clone(),
            runtime,
        })
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST one transition and wait for the receiver to acknowledge it.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Request`] on transport failure and
    /// [`WebhookError::Status`] when the receiver answers with a non-2xx.
    pub async fn deliver(&self, event: &TransitionEvent) -> Result<(), WebhookError> {
        let payload = RoomPayload::from(event);
        tracing::debug!(
            url = %self.url,
            event = ROOM_EVENT,
            person_in_room = payload.person_in_room,
            "posting transition"
        );

        let response = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(WebhookError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebhookError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

impl TransitionNotifier for WebhookNotifier {
    fn notify(&self, event: &TransitionEvent) -> Result<(), RoomwatchError> {
        self.runtime
            .block_on(self.deliver(event))
            .map_err(WebhookError::into_domain)
    }
}
