//! [`CommandBackend`] implementation over the Home Assistant REST API.

use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};

use roomwatch_app::ports::CommandBackend;
use roomwatch_domain::command::{Command, Device};
use roomwatch_domain::error::RoomwatchError;

use crate::config::{DeviceMap, HomeAssistantConfig};
use crate::error::HomeAssistantError;

/// One `POST /api/services/<domain>/<service>` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    pub domain: &'static str,
    pub service: &'static str,
    pub data: Value,
}

impl ServiceCall {
    fn endpoint(&self) -> String {
        format!("/api/services/{}/{}", self.domain, self.service)
    }
}

/// Talks to Home Assistant with a long-lived access token.
#[derive(Debug, Clone)]
pub struct HomeAssistantBackend {
    http: Client,
    base_url: String,
    token: String,
    devices: DeviceMap,
}

impl HomeAssistantBackend {
    /// Build a backend for the instance at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeAssistantError::Client`] if the HTTP client cannot be
    /// built.
    pub fn new(config: &HomeAssistantConfig, devices: DeviceMap) -> Result<Self, HomeAssistantError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(HomeAssistantError::Client)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            devices,
        })
    }

    /// Translate a device command into the service call that performs it.
    #[must_use]
    pub fn command_call(&self, device: Device, command: Command) -> ServiceCall {
        let entity_id = self.devices.entity_for(device);
        match (device, command) {
            (Device::Display, command) => ServiceCall {
                domain: "remote",
                service: "send_command",
                data: json!({
                    "entity_id": entity_id,
                    "device": self.devices.display_device,
                    "command": command.wire_name(),
                }),
            },
            (Device::MediaPlayer, Command::PowerOn) => ServiceCall {
                domain: "media_player",
                service: "turn_on",
                data: json!({ "entity_id": entity_id }),
            },
            (Device::MediaPlayer, Command::PowerOff) => ServiceCall {
                domain: "media_player",
                service: "turn_off",
                data: json!({ "entity_id": entity_id }),
            },
            (Device::MediaPlayer, Command::Key(key)) => ServiceCall {
                domain: "androidtv",
                service: "adb_command",
                data: json!({ "entity_id": entity_id, "command": key.as_str() }),
            },
        }
    }

    /// Translate a source selection into the service call that performs it.
    #[must_use]
    pub fn source_call(&self, device: Device, source: &str) -> ServiceCall {
        let entity_id = self.devices.entity_for(device);
        match device {
            Device::Display => ServiceCall {
                domain: "remote",
                service: "turn_on",
                data: json!({ "entity_id": entity_id, "activity": source }),
            },
            Device::MediaPlayer => ServiceCall {
                domain: "media_player",
                service: "select_source",
                data: json!({ "entity_id": entity_id, "source": source }),
            },
        }
    }

    /// Invoke a service.
    ///
    /// # Errors
    ///
    /// Fails on transport errors and non-2xx answers.
    pub async fn call_service(&self, call: &ServiceCall) -> Result<(), HomeAssistantError> {
        let endpoint = call.endpoint();
        tracing::debug!(%endpoint, data = %call.data, "calling service");

        let response = self
            .http
            .post(format!("{}{endpoint}", self.base_url))
            .bearer_auth(&self.token)
            .json(&call.data)
            .send()
            .await
            .map_err(|source| HomeAssistantError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;
        check(endpoint, response).await
    }

    /// Whether `entity_id` is registered.
    ///
    /// # Errors
    ///
    /// Fails on transport errors and any answer other than 2xx or 404.
    pub async fn entity_exists(&self, entity_id: &str) -> Result<bool, HomeAssistantError> {
        let endpoint = format!("/api/states/{entity_id}");
        let response = self
            .http
            .get(format!("{}{endpoint}", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| HomeAssistantError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check(endpoint, response).await?;
        Ok(true)
    }
}

async fn check(endpoint: String, response: Response) -> Result<(), HomeAssistantError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(HomeAssistantError::Unauthorized);
    }
    let body = response.text().await.unwrap_or_default();
    Err(HomeAssistantError::Status {
        endpoint,
        status: status.as_u16(),
        body,
    })
}

impl CommandBackend for HomeAssistantBackend {
    async fn is_available(&self) -> Result<bool, RoomwatchError> {
        let available = self
            .entity_exists(&self.devices.hub_entity)
            .await
            .map_err(HomeAssistantError::into_domain)?;
        if !available {
            tracing::warn!(hub = %self.devices.hub_entity, "hub entity not found");
        }
        Ok(available)
    }

    async fn send_command(&self, device: Device, command: Command) -> Result<(), RoomwatchError> {
        let call = self.command_call(device, command);
        self.call_service(&call)
            .await
            .map_err(HomeAssistantError::into_domain)
    }

    async fn select_source(&self, device: Device, source: &str) -> Result<(), RoomwatchError> {
        let call = self.source_call(device, source);
        self.call_service(&call)
            .await
            .map_err(HomeAssistantError::into_domain)
    }
}
