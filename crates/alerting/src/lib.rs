//! Alerting System
//!
//! Deduplicates cognitive-state alerts and maps per-student indicators to
//! instructor-panel alerts and pedagogical suggestions.

mod advisor;
mod manager;

pub use advisor::{advise, Advice, AdvisorThresholds, MealQuality, StudentAlert, StudentSnapshot, Suggestion};
pub use manager::{AlertConfig, AlertManager, AlertState, CognitiveAlert};
