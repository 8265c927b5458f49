//! Recording remote: stands in for the hub and media player.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use roomwatch_app::ports::CommandBackend;
use roomwatch_domain::command::{Command, Device};
use roomwatch_domain::error::RoomwatchError;

/// One call received by a [`VirtualRemote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Command { device: Device, command: Command },
    SelectSource { device: Device, source: String },
}

/// [`CommandBackend`] that logs every call and keeps a history.
#[derive(Debug)]
pub struct VirtualRemote {
    calls: Mutex<Vec<RecordedCall>>,
    available: AtomicBool,
}

impl Default for VirtualRemote {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl VirtualRemote {
    /// Calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Simulate the hub disappearing or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    fn record(&self, call: RecordedCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl CommandBackend for VirtualRemote {
    async fn is_available(&self) -> Result<bool, RoomwatchError> {
        Ok(self.available.load(Ordering::Relaxed))
    }

    async fn send_command(&self, device: Device, command: Command) -> Result<(), RoomwatchError> {
        tracing::info!(%device, command = command.wire_name(), "virtual remote command");
        self.record(RecordedCall::Command { device, command });
        Ok(())
    }

    async fn select_source(&self, device: Device, source: &str) -> Result<(), RoomwatchError> {
        tracing::info!(%device, source, "virtual remote select source");
        self.record(RecordedCall::SelectSource {
            device,
            source: source.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use roomwatch_domain::command::RemoteKey;

    use super::*;

    #[tokio::test]
    async fn should_record_calls_in_order() {
        let remote = VirtualRemote::default();
        remote
            .send_command(Device::Display, Command::PowerOn)
            .await
            .unwrap();
        remote
            .send_command(Device::MediaPlayer, Command::Key(RemoteKey::Home))
            .await
            .unwrap();
        remote
            .select_source(Device::MediaPlayer, "com.netflix.ninja")
            .await
            .unwrap();

        assert_eq!(
            remote.calls(),
            [
                RecordedCall::Command {
                    device: Device::Display,
                    command: Command::PowerOn,
                },
                RecordedCall::Command {
                    device: Device::MediaPlayer,
                    command: Command::Key(RemoteKey::Home),
                },
                RecordedCall::SelectSource {
                    device: Device::MediaPlayer,
                    source: "com.netflix.ninja".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn should_report_configured_availability() {
        let remote = VirtualRemote::default();
        assert!(remote.is_available().await.unwrap());
        remote.set_available(false);
        assert!(!remote.is_available().await.unwrap());
    }
}
