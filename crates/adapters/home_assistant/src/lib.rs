//! # roomwatch-adapter-home-assistant
//!
//! [`CommandBackend`](roomwatch_app::ports::CommandBackend) backed by the
//! Home Assistant REST API.
//!
//! | Device        | Operation        | Service call                     |
//! |---------------|------------------|----------------------------------|
//! | display       | power on / off   | `remote.send_command` via hub    |
//! | display       | key              | `remote.send_command` via hub    |
//! | display       | select source    | `remote.turn_on` (activity)      |
//! | media player  | power on / off   | `media_player.turn_on` / `turn_off` |
//! | media player  | key              | `androidtv.adb_command`          |
//! | media player  | select source    | `media_player.select_source`     |
//!
//! Hub availability is probed with `GET /api/states/<hub entity>`.

pub mod backend;
pub mod config;
pub mod error;

pub use backend::HomeAssistantBackend;
pub use config::{DeviceMap, HomeAssistantConfig};
pub use error::HomeAssistantError;
