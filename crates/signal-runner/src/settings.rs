//! Layered runner settings
//!
//! Sources, lowest priority first: preset defaults, an optional TOML file,
//! then `FACE_SIGNALS__SECTION__KEY` environment variables.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use face_signals::SignalConfig;
use serde::{Deserialize, Serialize};
use signal_dispatch::DispatchConfig;
use std::path::Path;

const ENV_PREFIX: &str = "FACE_SIGNALS";
const ENV_SEPARATOR: &str = "__";

/// Detector tuning preset used as the base layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    #[default]
    Default,
    Responsive,
    Steady,
}

impl Preset {
    pub fn detector_config(&self) -> SignalConfig {
        match self {
            Self::Default => SignalConfig::default(),
            Self::Responsive => SignalConfig::responsive(),
            Self::Steady => SignalConfig::steady(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

/// Complete runner configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub detector: SignalConfig,
    pub dispatch: DispatchConfig,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from all layers
    pub fn load(path: Option<&Path>, preset: Preset) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults(preset)?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    fn defaults(preset: Preset) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let base = Settings {
            detector: preset.detector_config(),
            ..Default::default()
        };
        Ok(Config::builder().add_source(Config::try_from(&base)?))
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}
