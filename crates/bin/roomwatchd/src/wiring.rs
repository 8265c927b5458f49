//! Adapters picked at startup, exposed through the port traits.

use roomwatch_adapter_home_assistant::{HomeAssistantBackend, HomeAssistantError};
use roomwatch_adapter_virtual::VirtualRemote;
use roomwatch_adapter_webhook::WebhookNotifier;
use roomwatch_app::ports::{CommandBackend, TransitionNotifier};
use roomwatch_app::sequencer::SequencerHandle;
use roomwatch_domain::command::{Command, Device};
use roomwatch_domain::error::RoomwatchError;
use roomwatch_domain::presence::TransitionEvent;

use crate::config::{Config, HubBackend};

/// Destination of detector transitions.
pub enum Notifier {
    Webhook(WebhookNotifier),
    Local(SequencerHandle),
}

impl TransitionNotifier for Notifier {
    fn notify(&self, event: &TransitionEvent) -> Result<(), RoomwatchError> {
        match self {
            Self::Webhook(webhook) => webhook.notify(event),
            Self::Local(handle) => handle.notify(event),
        }
    }
}

/// Device backend driven by the sequencer.
pub enum Hub {
    HomeAssistant(HomeAssistantBackend),
    Virtual(VirtualRemote),
}

impl Hub {
    pub fn from_config(config: &Config) -> Result<Self, HomeAssistantError> {
        match config.hub.backend {
            HubBackend::HomeAssistant => {
                if config.home_assistant.token.is_empty() {
                    tracing::warn!("no Home Assistant token configured, requests will be rejected");
                }
                let backend =
                    HomeAssistantBackend::new(&config.home_assistant, config.devices.clone())?;
                Ok(Self::HomeAssistant(backend))
            }
            HubBackend::Virtual => Ok(Self::Virtual(VirtualRemote::default())),
        }
    }
}

impl CommandBackend for Hub {
    async fn is_available(&self) -> Result<bool, RoomwatchError> {
        match self {
            Self::HomeAssistant(backend) => backend.is_available().await,
            Self::Virtual(remote) => remote.is_available().await,
        }
    }

    async fn send_command(&self, device: Device, command: Command) -> Result<(), RoomwatchError> {
        match self {
            Self::HomeAssistant(backend) => backend.send_command(device, command).await,
            Self::Virtual(remote) => remote.send_command(device, command).await,
        }
    }

    async fn select_source(&self, device: Device, source: &str) -> Result<(), RoomwatchError> {
        match self {
            Self::HomeAssistant(backend) => backend.select_source(device, source).await,
            Self::Virtual(remote) => remote.select_source(device, source).await,
        }
    }
}

/// Receiver of inbound `room` events; rejects them when the hub is off.
pub struct HubTrigger(Option<SequencerHandle>);

impl HubTrigger {
    pub fn new(handle: Option<SequencerHandle>) -> Self {
        Self(handle)
    }
}

impl TransitionNotifier for HubTrigger {
    fn notify(&self, event: &TransitionEvent) -> Result<(), RoomwatchError> {
        match &self.0 {
            Some(handle) => handle.notify(event),
            None => Err(RoomwatchError::delivery("automation hub is disabled")),
        }
    }
}
