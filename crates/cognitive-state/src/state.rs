//! Cognitive state labels and session tracking

use crate::blink::BlinkTracker;
use crate::config::{CascadeThresholds, ClassifierConfig};
use crate::CognitiveError;
use ear_window::EarWindow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cognitive state derived from eye openness and blink rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CognitiveState {
    Fatigue,
    Distraction,
    Focus,
    #[default]
    Neutral,
}

impl CognitiveState {
    pub const ALL: [CognitiveState; 4] = [
        CognitiveState::Fatigue,
        CognitiveState::Distraction,
        CognitiveState::Focus,
        CognitiveState::Neutral,
    ];

    /// Human-readable message shown with the label
    pub fn message(&self) -> &'static str {
        match self {
            CognitiveState::Fatigue => "strong signs of drowsiness.",
            CognitiveState::Distraction => "excessive blinking detected.",
            CognitiveState::Focus => "stable visual attention.",
            CognitiveState::Neutral => "regular cognitive state.",
        }
    }
}

impl fmt::Display for CognitiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CognitiveState::Fatigue => "Fatigue",
            CognitiveState::Distraction => "Distraction",
            CognitiveState::Focus => "Focus",
            CognitiveState::Neutral => "Neutral",
        };
        f.write_str(name)
    }
}

impl CascadeThresholds {
    /// Rule cascade; first match wins.
    pub fn classify(&self, mean_ear: f32, blink_rate_per_minute: f32) -> (CognitiveState, &'static str) {
        // Fatigue outranks distraction when both hold
        let state = if mean_ear < self.fatigue_ear {
            CognitiveState::Fatigue
        } else if blink_rate_per_minute > self.distraction_blink_rate {
            CognitiveState::Distraction
        } else if mean_ear > self.focus_ear {
            CognitiveState::Focus
        } else {
            CognitiveState::Neutral
        };
        (state, state.message())
    }
}

/// Classify with the default thresholds (0.18 / 25 / 0.28)
pub fn classify(mean_ear: f32, blink_rate_per_minute: f32) -> (CognitiveState, &'static str) {
    CascadeThresholds::default().classify(mean_ear, blink_rate_per_minute)
}

/// Per-session state, owned by the polling loop
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Rolling window of combined EAR samples
    pub window: EarWindow,

    pub blinks: BlinkTracker,

    /// Last evaluated state, kept across missed detections
    pub last_state: Option<CognitiveState>,

    /// Frames without a usable detection
    pub missed_frames: u64,

    /// Timestamp of the most recent frame seen
    pub last_timestamp_ms: Option<u64>,
}

impl SessionState {
    pub fn new(config: &ClassifierConfig) -> Result<Self, CognitiveError> {
        let window =
            EarWindow::new(config.window_size).map_err(|e| CognitiveError::Config(e.to_string()))?;
        Ok(Self {
            window,
            blinks: BlinkTracker::new(config.blink_threshold, config.blink_rate_policy),
            last_state: None,
            missed_frames: 0,
            last_timestamp_ms: None,
        })
    }

    /// Reset for a new session
    pub fn reset(&mut self) {
        self.window.clear();
        self.blinks.reset();
        self.last_state = None;
        self.missed_frames = 0;
        self.last_timestamp_ms = None;
    }
}
