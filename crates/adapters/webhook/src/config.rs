//! Webhook configuration.

use std::time::Duration;

use serde::Deserialize;

/// Where and how transitions are delivered.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Full webhook URL, including the webhook id.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl WebhookConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: "http://homeassistant.local:8123/api/webhook/room".to_string(),
            timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_local_home_assistant_webhook() {
        let config = WebhookConfig::default();
        assert_eq!(
            config.url,
            "http://homeassistant.local:8123/api/webhook/room"
        );
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let config: WebhookConfig = toml::from_str(r#"url = "http://hub:8123/api/webhook/den""#).unwrap();
        assert_eq!(config.url, "http://hub:8123/api/webhook/den");
        assert_eq!(config.timeout_secs, 10);
    }
}
