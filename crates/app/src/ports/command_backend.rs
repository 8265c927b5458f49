//! Command backend port: the remote-control hub and media player.

use std::future::Future;
use std::sync::Arc;

use roomwatch_domain::command::{Command, Device};
use roomwatch_domain::error::RoomwatchError;

/// Sends commands to the devices driven by the automation plan.
///
/// Each call is a single fallible request with no implicit retry.
pub trait CommandBackend: Send + Sync {
    /// Whether the hub is reachable and registered.
    ///
    /// The sequencer skips a run entirely when this returns `Ok(false)`.
    /// The default implementation always reports the hub as available.
    fn is_available(&self) -> impl Future<Output = Result<bool, RoomwatchError>> + Send {
        async { Ok(true) }
    }

    /// Send `command` to `device`.
    fn send_command(
        &self,
        device: Device,
        command: Command,
    ) -> impl Future<Output = Result<(), RoomwatchError>> + Send;

    /// Switch `device` to the input or app identified by `source`.
    fn select_source(
        &self,
        device: Device,
        source: &str,
    ) -> impl Future<Output = Result<(), RoomwatchError>> + Send;
}

impl<T: CommandBackend> CommandBackend for Arc<T> {
    fn is_available(&self) -> impl Future<Output = Result<bool, RoomwatchError>> + Send {
        (**self).is_available()
    }

    fn send_command(
        &self,
        device: Device,
        command: Command,
    ) -> impl Future<Output = Result<(), RoomwatchError>> + Send {
        (**self).send_command(device, command)
    }

    fn select_source(
        &self,
        device: Device,
        source: &str,
    ) -> impl Future<Output = Result<(), RoomwatchError>> + Send {
        (**self).select_source(device, source)
    }
}
