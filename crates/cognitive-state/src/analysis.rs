//! Per-frame classifier output

use crate::expression::Expression;
use crate::landmarks::LandmarkSet;
use crate::state::CognitiveState;
use ear_window::WindowStats;
use serde::{Deserialize, Serialize};

/// One frame handed to the classifier
#[derive(Debug, Clone)]
pub struct FrameObservation {
    /// Capture timestamp (milliseconds)
    pub timestamp_ms: u64,
    /// `None` when the face mesh found no face in this frame
    pub landmarks: Option<LandmarkSet>,
}

impl FrameObservation {
    pub fn detected(timestamp_ms: u64, landmarks: LandmarkSet) -> Self {
        Self {
            timestamp_ms,
            landmarks: Some(landmarks),
        }
    }

    pub fn missing(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            landmarks: None,
        }
    }
}

/// Classifier result for a single frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    pub timestamp_ms: u64,

    /// Whether a usable sample was recorded for this frame
    pub face_detected: bool,

    /// Combined EAR of this frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ear: Option<f32>,

    /// Window mean, only once the window is full
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_ear: Option<f32>,

    /// Spread of the samples behind `mean_ear`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_stats: Option<WindowStats>,

    pub blink_rate_per_minute: f32,

    pub blink_count: u64,

    /// The rule cascade ran on this frame
    pub evaluated: bool,

    /// Last known state (carried over frames without evaluation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<CognitiveState>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<Expression>,
}

impl FrameAnalysis {
    /// Label and message pair, if any evaluation happened yet
    pub fn reading(&self) -> Option<(CognitiveState, &'static str)> {
        self.state.map(|s| (s, s.message()))
    }

    /// Whether the current state calls for attention
    pub fn needs_attention(&self) -> bool {
        matches!(
            self.state,
            Some(CognitiveState::Fatigue) | Some(CognitiveState::Distraction)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_state(state: Option<CognitiveState>) -> FrameAnalysis {
        FrameAnalysis {
            state,
            ..Default::default()
        }
    }

    #[test]
    fn test_needs_attention() {
        assert!(with_state(Some(CognitiveState::Fatigue)).needs_attention());
        assert!(with_state(Some(CognitiveState::Distraction)).needs_attention());
        assert!(!with_state(Some(CognitiveState::Focus)).needs_attention());
        assert!(!with_state(Some(CognitiveState::Neutral)).needs_attention());
        assert!(!with_state(None).needs_attention());
    }

    #[test]
    fn test_window_stats_omitted_until_available() {
        let json = serde_json::to_value(with_state(None)).unwrap();
        assert!(json.get("window_stats").is_none());
    }
}
