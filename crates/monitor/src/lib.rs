//! Cognitive State Monitor
//!
//! Drives the eye-state classifier from a frame source at a fixed pace and
//! collects a per-session report.

pub mod config;
pub mod report;
pub mod runner;
pub mod source;

pub use crate::config::MonitorConfig;
pub use report::{SessionReport, SessionSummary};
pub use runner::MonitorLoop;
pub use source::{FrameRecord, FrameSource, JsonLinesSource, VecSource};

use cognitive_state::CognitiveError;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] CognitiveError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Initialize logging at the given maximum level
pub fn init_logging(level: &str) -> Result<(), MonitorError> {
    let level: Level = level
        .parse()
        .map_err(|_| MonitorError::Logging(format!("unknown log level '{level}'")))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(|e| MonitorError::Logging(e.to_string()))
}
