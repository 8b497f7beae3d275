//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Environment variable prefix, e.g. `DRIVING_STATE_LOCALE=zh`
pub const ENV_PREFIX: &str = "DRIVING_STATE";

/// Language of display labels and recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

/// Engine configuration.
///
/// Rule thresholds are policy constants and intentionally absent here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Presentation language
    pub locale: Locale,

    /// Reject snapshots whose AU section lacks any of the 17 units
    pub strict_action_units: bool,

    /// Max level for `init_logging`
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locale: Locale::En,
            strict_action_units: true,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load from an optional file, overlaid with `DRIVING_STATE_*` variables
    pub fn load(path: Option<&str>) -> Result<Self, EngineError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));

        builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, EngineError> {
        config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Chinese presentation tables
    pub fn zh() -> Self {
        Self {
            locale: Locale::Zh,
            ..Default::default()
        }
    }

    /// Accept AU sections with missing units
    pub fn lenient() -> Self {
        Self {
            strict_action_units: false,
            ..Default::default()
        }
    }
}
