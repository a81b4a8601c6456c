//! Classifier configuration

use crate::expression::ExpressionRules;
use crate::CognitiveError;
use ear_window::DEFAULT_WINDOW_SIZE;
use serde::{Deserialize, Serialize};

/// Accepted range for the blink sensitivity threshold
pub const BLINK_THRESHOLD_RANGE: (f32, f32) = (0.10, 0.40);

/// When the rule cascade runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EvaluationCadence {
    /// Every recorded sample once the window is full
    EveryFrame,
    /// Every `every` accumulated samples, once the window is full
    Periodic { every: usize },
}

impl Default for EvaluationCadence {
    fn default() -> Self {
        Self::Periodic {
            every: DEFAULT_WINDOW_SIZE,
        }
    }
}

/// How below-threshold samples turn into a per-minute blink rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BlinkRatePolicy {
    /// Count within the trailing `window_ms`, scaled to one minute
    TrailingWindow { window_ms: u64 },
    /// Total count divided by elapsed session minutes (floored at 1 minute)
    SessionAverage,
}

impl Default for BlinkRatePolicy {
    fn default() -> Self {
        Self::TrailingWindow { window_ms: 60_000 }
    }
}

/// Thresholds of the rule cascade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeThresholds {
    /// Mean EAR below this is fatigue
    pub fatigue_ear: f32,
    /// Blinks per minute above this is distraction
    pub distraction_blink_rate: f32,
    /// Mean EAR above this is focus
    pub focus_ear: f32,
}

impl Default for CascadeThresholds {
    fn default() -> Self {
        Self {
            fatigue_ear: 0.18,
            distraction_blink_rate: 25.0,
            focus_ear: 0.28,
        }
    }
}

/// Eye-state classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Number of combined EAR samples in the rolling window
    pub window_size: usize,

    /// Samples below this EAR count as blinks
    pub blink_threshold: f32,

    pub thresholds: CascadeThresholds,

    pub cadence: EvaluationCadence,

    pub blink_rate_policy: BlinkRatePolicy,

    /// Also run the facial expression heuristic per frame
    pub detect_expression: bool,

    pub expression: ExpressionRules,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            blink_threshold: 0.25,
            thresholds: CascadeThresholds::default(),
            cadence: EvaluationCadence::default(),
            blink_rate_policy: BlinkRatePolicy::default(),
            detect_expression: false,
            expression: ExpressionRules::default(),
        }
    }
}

impl ClassifierConfig {
    /// Stricter config (fatigue reported earlier, fewer blinks tolerated)
    pub fn strict() -> Self {
        Self {
            blink_threshold: 0.22,
            thresholds: CascadeThresholds {
                fatigue_ear: 0.20,
                distraction_blink_rate: 20.0,
                focus_ear: 0.30,
            },
            cadence: EvaluationCadence::EveryFrame,
            ..Default::default()
        }
    }

    /// Lenient config (the 0.20 / 0.35 bands)
    pub fn lenient() -> Self {
        Self {
            thresholds: CascadeThresholds {
                fatigue_ear: 0.20,
                distraction_blink_rate: 30.0,
                focus_ear: 0.35,
            },
            blink_rate_policy: BlinkRatePolicy::SessionAverage,
            ..Default::default()
        }
    }

    /// Check ranges. The classifier itself never clamps; callers run this first.
    pub fn validate(&self) -> Result<(), CognitiveError> {
        if self.window_size == 0 {
            return Err(CognitiveError::Config("window_size must be at least 1".into()));
        }

        let (lo, hi) = BLINK_THRESHOLD_RANGE;
        if !(lo..=hi).contains(&self.blink_threshold) {
            return Err(CognitiveError::Config(format!(
                "blink_threshold {} outside [{lo}, {hi}]",
                self.blink_threshold
            )));
        }

        let t = &self.thresholds;
        if !(t.fatigue_ear.is_finite() && t.focus_ear.is_finite() && t.distraction_blink_rate.is_finite()) {
            return Err(CognitiveError::Config("cascade thresholds must be finite".into()));
        }

        if t.fatigue_ear >= t.focus_ear {
            return Err(CognitiveError::Config(format!(
                "fatigue_ear {} must be below focus_ear {}",
                t.fatigue_ear, t.focus_ear
            )));
        }

        if t.distraction_blink_rate < 0.0 {
            return Err(CognitiveError::Config("distraction_blink_rate must be non-negative".into()));
        }

        if let EvaluationCadence::Periodic { every: 0 } = self.cadence {
            return Err(CognitiveError::Config("cadence.every must be at least 1".into()));
        }

        if let BlinkRatePolicy::TrailingWindow { window_ms: 0 } = self.blink_rate_policy {
            return Err(CognitiveError::Config("blink window_ms must be non-zero".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(ClassifierConfig::default().validate().is_ok());
        assert!(ClassifierConfig::strict().validate().is_ok());
        assert!(ClassifierConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_blink_threshold_out_of_range() {
        let config = ClassifierConfig {
            blink_threshold: 0.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CognitiveError::Config(_))));
    }

    #[test]
    fn test_zero_cadence_rejected() {
        let config = ClassifierConfig {
            cadence: EvaluationCadence::Periodic { every: 0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_thresholds_rejected() {
        for thresholds in [
            CascadeThresholds {
                fatigue_ear: f32::NAN,
                ..Default::default()
            },
            CascadeThresholds {
                focus_ear: f32::NAN,
                ..Default::default()
            },
            CascadeThresholds {
                distraction_blink_rate: f32::NAN,
                ..Default::default()
            },
            CascadeThresholds {
                focus_ear: f32::INFINITY,
                ..Default::default()
            },
        ] {
            let config = ClassifierConfig {
                thresholds,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(CognitiveError::Config(_))), "{thresholds:?}");
        }
    }

    #[test]
    fn test_zero_blink_window_rejected() {
        let config = ClassifierConfig {
            blink_rate_policy: BlinkRatePolicy::TrailingWindow { window_ms: 0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_bands_rejected() {
        let config = ClassifierConfig {
            thresholds: CascadeThresholds {
                fatigue_ear: 0.3,
                distraction_blink_rate: 25.0,
                focus_ear: 0.2,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serde_shape() {
        let json = r#"{
            "window_size": 15,
            "cadence": { "mode": "every_frame" },
            "blink_rate_policy": { "mode": "session_average" }
        }"#;
        let config: ClassifierConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.window_size, 15);
        assert_eq!(config.cadence, EvaluationCadence::EveryFrame);
        assert_eq!(config.blink_rate_policy, BlinkRatePolicy::SessionAverage);
        assert_eq!(config.blink_threshold, 0.25);
    }
}
