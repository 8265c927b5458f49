//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `roomwatch.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use roomwatch_adapter_home_assistant::{DeviceMap, HomeAssistantConfig};
use roomwatch_adapter_virtual::PresencePattern;
use roomwatch_adapter_webhook::WebhookConfig;
use roomwatch_app::pipeline::PipelineSettings;
use roomwatch_domain::presence::{DEFAULT_THRESHOLD, DEFAULT_TIME_WINDOW_SECS, HysteresisVote};
use roomwatch_domain::sequence::{AutomationPlan, SequenceSettings};
use roomwatch_domain::streaming::StreamingApp;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Presence detection pipeline.
    pub detector: DetectorConfig,
    /// Outbound transition webhook.
    pub webhook: WebhookConfig,
    /// Automation side toggles.
    pub hub: HubConfig,
    /// Home Assistant connection, used by the `home_assistant` hub backend.
    pub home_assistant: HomeAssistantConfig,
    /// Entity ids behind each device.
    pub devices: DeviceMap,
    /// Automation plan tunables.
    pub sequence: SequenceConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Where the detector sends transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// POST to `[webhook] url`.
    Webhook,
    /// Hand straight to the in-process sequencer.
    Local,
}

/// Detector implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorSource {
    /// Scripted presence pattern, no camera needed.
    Virtual,
}

/// Presence detection pipeline configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub enabled: bool,
    pub source: DetectorSource,
    pub delivery: Delivery,
    /// Window span in seconds; each window holds one more sample than this.
    pub time_window_secs: u64,
    /// Fraction of disagreeing samples needed to flip.
    pub threshold: f64,
    pub poll_interval_ms: u64,
    pub queue_capacity: usize,
    /// Capture size hint for camera-backed detectors.
    pub frame_width: u32,
    pub frame_height: u32,
    /// Pattern replayed by the virtual detector, e.g. `present:30,absent:30`.
    pub pattern: String,
}

/// Hub backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HubBackend {
    HomeAssistant,
    /// Log commands instead of sending them.
    Virtual,
}

/// Automation side configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Run the automation sequencer and accept `room` events.
    pub enabled: bool,
    pub backend: HubBackend,
    /// Pending triggers kept while a run is being superseded.
    pub queue_capacity: usize,
}

/// Automation plan configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// App selected on the media player.
    pub app: StreamingApp,
    /// Raw source id, overrides `app`.
    pub source: Option<String>,
    pub settle_delay_secs: u64,
    pub confirm_presses: u8,
    pub confirm_interval_secs: u64,
}

impl Config {
    /// Load configuration from `roomwatch.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("roomwatch.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ROOMWATCH_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("ROOMWATCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("ROOMWATCH_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("ROOMWATCH_WEBHOOK_URL") {
            self.webhook.url = val;
        }
        if let Ok(val) = std::env::var("ROOMWATCH_HA_TOKEN") {
            self.home_assistant.token = val;
        }
        if let Ok(val) = std::env::var("ROOMWATCH_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.detector.enabled {
            self.detector.pipeline_settings()?;
            self.detector.presence_pattern()?;
            match self.detector.delivery {
                Delivery::Webhook if self.webhook.url.trim().is_empty() => {
                    return Err(ConfigError::Validation(
                        "webhook url must not be empty".to_string(),
                    ));
                }
                Delivery::Local if !self.hub.enabled => {
                    return Err(ConfigError::Validation(
                        "local delivery requires the hub to be enabled".to_string(),
                    ));
                }
                _ => {}
            }
        }
        if self.hub.enabled {
            if self.hub.queue_capacity == 0 {
                return Err(ConfigError::Validation(
                    "hub queue capacity must be greater than zero".to_string(),
                ));
            }
            if self.hub.backend == HubBackend::HomeAssistant
                && self.home_assistant.base_url.trim().is_empty()
            {
                return Err(ConfigError::Validation(
                    "home assistant base url must not be empty".to_string(),
                ));
            }
            AutomationPlan::standard(&self.sequence.settings())
                .map_err(|err| ConfigError::Validation(err.to_string()))?;
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DetectorConfig {
    /// Pipeline tunables.
    ///
    /// # Errors
    ///
    /// Rejects a zero window, a threshold outside (0, 1) and a zero queue
    /// capacity.
    pub fn pipeline_settings(&self) -> Result<PipelineSettings, ConfigError> {
        if self.time_window_secs == 0 {
            return Err(ConfigError::Validation(
                "detector time window must be greater than zero".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "detector queue capacity must be greater than zero".to_string(),
            ));
        }
        let vote = HysteresisVote::new(self.threshold)
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        Ok(PipelineSettings {
            time_window_secs: self.time_window_secs,
            vote,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            queue_capacity: self.queue_capacity,
        })
    }

    /// Parsed virtual detector pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a malformed pattern.
    pub fn presence_pattern(&self) -> Result<PresencePattern, ConfigError> {
        self.pattern
            .parse()
            .map_err(|err: roomwatch_adapter_virtual::PatternError| {
                ConfigError::Validation(err.to_string())
            })
    }
}

impl SequenceConfig {
    /// Plan tunables, resolving `source` over `app`.
    #[must_use]
    pub fn settings(&self) -> SequenceSettings {
        SequenceSettings {
            source: self
                .source
                .clone()
                .unwrap_or_else(|| self.app.source_id().to_string()),
            settle_delay: Duration::from_secs(self.settle_delay_secs),
            confirm_presses: self.confirm_presses,
            confirm_interval: Duration::from_secs(self.confirm_interval_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "roomwatchd=info,roomwatch=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source: DetectorSource::Virtual,
            delivery: Delivery::Webhook,
            time_window_secs: DEFAULT_TIME_WINDOW_SECS,
            threshold: DEFAULT_THRESHOLD,
            poll_interval_ms: 100,
            queue_capacity: 4,
            frame_width: 320,
            frame_height: 240,
            pattern: PresencePattern::default().to_string(),
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: HubBackend::Virtual,
            queue_capacity: 8,
        }
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        let defaults = SequenceSettings::default();
        Self {
            app: StreamingApp::default(),
            source: None,
            settle_delay_secs: defaults.settle_delay.as_secs(),
            confirm_presses: defaults.confirm_presses,
            confirm_interval_secs: defaults.confirm_interval.as_secs(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
