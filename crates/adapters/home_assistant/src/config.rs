//! Home Assistant connection and device configuration.

use std::time::Duration;

use serde::Deserialize;

use roomwatch_domain::command::Device;

/// How to reach the Home Assistant instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HomeAssistantConfig {
    /// Base URL, without trailing `/api`.
    pub base_url: String,
    /// Long-lived access token.
    pub token: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl HomeAssistantConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HomeAssistantConfig {
    fn default() -> Self {
        Self {
            base_url: "http://homeassistant.local:8123".to_string(),
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Which Home Assistant entities stand behind each [`Device`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceMap {
    /// Remote-control hub entity; also the availability probe target.
    pub hub_entity: String,
    /// Device code of the display as registered on the hub.
    pub display_device: String,
    /// Media player entity.
    pub media_player: String,
}

impl DeviceMap {
    /// Entity that receives service calls for `device`.
    #[must_use]
    pub fn entity_for(&self, device: Device) -> &str {
        match device {
            Device::Display => &self.hub_entity,
            Device::MediaPlayer => &self.media_player,
        }
    }
}

impl Default for DeviceMap {
    fn default() -> Self {
        Self {
            hub_entity: "remote.harmony_hub".to_string(),
            display_device: "77186046".to_string(),
            media_player: "media_player.fire_tv_smart_lab".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = HomeAssistantConfig::default();
        assert_eq!(config.base_url, "http://homeassistant.local:8123");
        assert!(config.token.is_empty());
        assert_eq!(config.timeout(), Duration::from_secs(10));

        let devices = DeviceMap::default();
        assert_eq!(devices.hub_entity, "remote.harmony_hub");
        assert_eq!(devices.display_device, "77186046");
        assert_eq!(devices.media_player, "media_player.fire_tv_smart_lab");
    }

    #[test]
    fn should_route_display_through_hub() {
        let devices = DeviceMap::default();
        assert_eq!(devices.entity_for(Device::Display), "remote.harmony_hub");
        assert_eq!(
            devices.entity_for(Device::MediaPlayer),
            "media_player.fire_tv_smart_lab"
        );
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let devices: DeviceMap = toml::from_str(r#"media_player = "media_player.shield""#).unwrap();
        assert_eq!(devices.media_player, "media_player.shield");
        assert_eq!(devices.hub_entity, "remote.harmony_hub");
    }
}
