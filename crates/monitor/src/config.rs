//! Layered monitor configuration
//!
//! Priority, lowest first: built-in defaults, optional TOML file,
//! `NUTRIEDU__*` environment variables (`__` separates nesting levels,
//! e.g. `NUTRIEDU__CLASSIFIER__BLINK_THRESHOLD=0.3`).

use crate::MonitorError;
use alerting::{AdvisorThresholds, AlertConfig, MealQuality};
use cognitive_state::ClassifierConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const ENV_PREFIX: &str = "NUTRIEDU";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Maximum tracing level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Fixed delay between frames (33 ms = ~30 fps)
    pub frame_interval_ms: u64,

    /// Meal quality reported to the advisor for this session
    pub pre_class_meal: MealQuality,

    pub classifier: ClassifierConfig,

    pub alerts: AlertConfig,

    pub advisor: AdvisorThresholds,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            frame_interval_ms: 33,
            pre_class_meal: MealQuality::default(),
            classifier: ClassifierConfig::default(),
            alerts: AlertConfig::default(),
            advisor: AdvisorThresholds::default(),
        }
    }
}

/// Load configuration from defaults, an optional file, and the process environment
pub fn load(path: Option<&Path>) -> Result<MonitorConfig, MonitorError> {
    load_with_env(path, Environment::with_prefix(ENV_PREFIX))
}

/// Same as [`load`] with an explicit environment source
pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<MonitorConfig, MonitorError> {
    let mut builder = Config::builder().add_source(Config::try_from(&MonitorConfig::default())?);

    if let Some(path) = path {
        debug!("Loading config file {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    }

    let config: MonitorConfig = builder
        .add_source(env.prefix_separator("__").separator("__").try_parsing(true))
        .build()?
        .try_deserialize()?;

    config.classifier.validate()?;
    Ok(config)
}
