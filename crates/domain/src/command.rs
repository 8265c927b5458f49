//! Device commands: the closed set of things the automation may ask a device to do.
//!
//! Commands never travel as free-form strings inside the workspace; adapters
//! translate them to wire names at the last moment via [`Command::wire_name`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical device targeted by a command.
///
/// Backends map each target to their own identifiers (hub device code,
/// media-player entity id, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    /// The display, powered through the remote-control hub.
    Display,
    /// The streaming media player attached to the display.
    MediaPlayer,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Display => f.write_str("display"),
            Self::MediaPlayer => f.write_str("media_player"),
        }
    }
}

/// Remote-control keys understood by the media player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoteKey {
    Power,
    Sleep,
    Home,
    Up,
    Down,
    Left,
    Right,
    Center,
    Back,
    Menu,
}

impl RemoteKey {
    /// Every key, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Power,
        Self::Sleep,
        Self::Home,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Center,
        Self::Back,
        Self::Menu,
    ];

    /// Key name as sent to the device.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Power => "POWER",
            Self::Sleep => "SLEEP",
            Self::Home => "HOME",
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Center => "CENTER",
            Self::Back => "BACK",
            Self::Menu => "MENU",
        }
    }
}

impl fmt::Display for RemoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command sent to a [`Device`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Discrete power-on, forwarded by the hub.
    PowerOn,
    /// Discrete power-off, forwarded by the hub.
    PowerOff,
    /// A single key press.
    Key(RemoteKey),
}

impl Command {
    /// Command name as the device backend expects it.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::PowerOn => "PowerOn",
            Self::PowerOff => "PowerOff",
            Self::Key(key) => key.as_str(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
