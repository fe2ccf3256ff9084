use ds_edid::{ChecksumPolicy, EdidOptions};
use ds_modes::{Negotiator, TableError, FALLBACK_RESOLUTION};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid fallback resolution: {0}")]
    Fallback(#[from] TableError),

    #[error("at least one video port must be configured")]
    NoPorts,
}

/// Video port HAL settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HalConfig {
    /// How EDIDs with a bad base-block checksum are treated by `get_edid`.
    pub checksum_policy: ChecksumPolicy,
    /// Resolution requested when `set_resolution` gets a name the mode map does not know.
    pub fallback_resolution: String,
    pub hdmi_ports: u8,
    pub composite_ports: u8,
    /// Pending notifications kept before the oldest are dropped.
    pub event_queue_len: usize,
}

impl Default for HalConfig {
    fn default() -> Self {
        Self {
            checksum_policy: ChecksumPolicy::Strict,
            fallback_resolution: FALLBACK_RESOLUTION.to_string(),
            hdmi_ports: 1,
            composite_ports: 1,
            event_queue_len: 64,
        }
    }
}

impl HalConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `DS_CHECKSUM_POLICY`, `DS_FALLBACK_RESOLUTION` and
    /// `DS_EVENT_QUEUE_LEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("DS_CHECKSUM_POLICY") {
            config.checksum_policy = match value.trim().to_ascii_lowercase().as_str() {
                "strict" => ChecksumPolicy::Strict,
                "lenient" => ChecksumPolicy::Lenient,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "DS_CHECKSUM_POLICY",
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup("DS_FALLBACK_RESOLUTION") {
            config.fallback_resolution = value.trim().to_string();
        }
        if let Some(value) = lookup("DS_EVENT_QUEUE_LEN") {
            config.event_queue_len =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnv {
                        var: "DS_EVENT_QUEUE_LEN",
                        value: value.clone(),
                    })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hdmi_ports == 0 && self.composite_ports == 0 {
            return Err(ConfigError::NoPorts);
        }
        self.negotiator()?;
        Ok(())
    }

    pub fn negotiator(&self) -> Result<Negotiator, ConfigError> {
        Ok(Negotiator::with_fallback(&self.fallback_resolution)?)
    }

    pub fn edid_options(&self) -> EdidOptions {
        EdidOptions {
            checksum: self.checksum_policy,
            current_year: None,
        }
    }
}
