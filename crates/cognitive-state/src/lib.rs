//! Cognitive State Classifier
//!
//! Eye-aspect-ratio analysis of face-mesh landmarks:
//! - Per-eye and combined EAR
//! - Rolling window mean
//! - Blink counting and blink rate
//! - Fatigue / distraction / focus rule cascade
//! - Optional facial expression heuristic

pub mod analysis;
pub mod blink;
pub mod config;
pub mod expression;
pub mod landmarks;
pub mod state;

pub use analysis::{FrameAnalysis, FrameObservation};
pub use blink::BlinkTracker;
pub use config::{BlinkRatePolicy, CascadeThresholds, ClassifierConfig, EvaluationCadence};
pub use expression::{Expression, ExpressionRules};
pub use landmarks::{
    combined_ear, compute_ear, synthetic_mesh, EyeIndices, LandmarkSet, Point2, LEFT_EYE, RIGHT_EYE,
};
pub use state::{classify, CognitiveState, SessionState};

pub use ear_window::WindowStats;

use thiserror::Error;
use tracing::{debug, info};

/// Classifier error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CognitiveError {
    #[error("Malformed landmarks: {0}")]
    MalformedLandmarks(String),

    #[error("Landmark index {0} missing for feature calculation")]
    KeypointsMissing(usize),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Eye-state classifier. Owns its session state; drive it from one loop.
pub struct EyeStateClassifier {
    config: ClassifierConfig,
    state: SessionState,
}

impl EyeStateClassifier {
    /// Create a classifier. Thresholds are used as given; see [`ClassifierConfig::validate`].
    pub fn new(config: ClassifierConfig) -> Result<Self, CognitiveError> {
        Ok(Self {
            state: SessionState::new(&config)?,
            config,
        })
    }

    /// Analyze a single frame
    pub fn process(&mut self, frame: &FrameObservation) -> FrameAnalysis {
        let ts = frame.timestamp_ms;
        self.state.last_timestamp_ms = Some(ts);

        let Some(landmarks) = &frame.landmarks else {
            self.state.missed_frames += 1;
            debug!(timestamp_ms = ts, "No face detected, keeping last state");
            return self.snapshot(ts, None, None, false);
        };

        let ear = match combined_ear(landmarks) {
            Ok(ear) => ear,
            Err(e) => {
                self.state.missed_frames += 1;
                debug!(timestamp_ms = ts, error = %e, "Skipping frame");
                return self.snapshot(ts, None, None, false);
            }
        };

        self.state.window.push(ear);
        self.state.blinks.observe(ear, ts);

        let expression = self
            .config
            .detect_expression
            .then(|| self.config.expression.detect(landmarks));

        let evaluated = self.evaluate(ts);
        self.snapshot(ts, Some(ear), expression, evaluated)
    }

    fn due(&self) -> bool {
        if !self.state.window.is_full() {
            return false;
        }
        match self.config.cadence {
            EvaluationCadence::EveryFrame => true,
            EvaluationCadence::Periodic { every } => {
                every > 0 && self.state.window.total_recorded() % every == 0
            }
        }
    }

    /// Run the cascade if the cadence says so
    fn evaluate(&mut self, ts: u64) -> bool {
        if !self.due() {
            return false;
        }
        let Some(mean) = self.state.window.mean() else {
            return false;
        };

        let rate = self.state.blinks.rate_per_minute(ts);
        let (label, message) = self.config.thresholds.classify(mean, rate);

        if self.state.last_state != Some(label) {
            info!(
                timestamp_ms = ts,
                mean_ear = mean,
                blink_rate = rate,
                "Cognitive state {}: {}",
                label,
                message
            );
        } else {
            debug!(timestamp_ms = ts, mean_ear = mean, blink_rate = rate, "Cognitive state unchanged: {}", label);
        }

        self.state.last_state = Some(label);
        true
    }

    fn snapshot(
        &self,
        ts: u64,
        ear: Option<f32>,
        expression: Option<Expression>,
        evaluated: bool,
    ) -> FrameAnalysis {
        FrameAnalysis {
            timestamp_ms: ts,
            face_detected: ear.is_some(),
            ear,
            mean_ear: self.state.window.mean(),
            window_stats: self.state.window.stats(),
            blink_rate_per_minute: self.state.blinks.rate_per_minute(ts),
            blink_count: self.state.blinks.total(),
            evaluated,
            state: self.state.last_state,
            expression,
        }
    }

    /// Last evaluated state
    pub fn current_state(&self) -> Option<CognitiveState> {
        self.state.last_state
    }

    pub fn session(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Start a new session (new student or restart)
    pub fn reset(&mut self) {
        info!("Resetting classifier session");
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: u64 = 33;

    fn frame(i: u64, ear: f32) -> FrameObservation {
        let set = LandmarkSet::new(synthetic_mesh(ear, ear)).unwrap();
        FrameObservation::detected(i * FRAME_MS, set)
    }

    #[test]
    fn test_no_evaluation_before_window_full() {
        let mut classifier = EyeStateClassifier::new(ClassifierConfig::default()).unwrap();
        for i in 0..29 {
            let analysis = classifier.process(&frame(i, 0.3));
            assert!(!analysis.evaluated);
            assert_eq!(analysis.mean_ear, None);
            assert_eq!(analysis.state, None);
        }
        let analysis = classifier.process(&frame(29, 0.3));
        assert!(analysis.evaluated);
        assert_eq!(analysis.reading(), Some((CognitiveState::Focus, "stable visual attention.")));
    }

    #[test]
    fn test_alternating_scenario() {
        let mut classifier = EyeStateClassifier::new(ClassifierConfig::default()).unwrap();
        let mut evaluations = Vec::new();

        for i in 0..35 {
            let ear = if i % 2 == 0 { 0.10 } else { 0.35 };
            let analysis = classifier.process(&frame(i, ear));
            if analysis.evaluated {
                evaluations.push(analysis);
            }
        }

        // Periodic cadence: only the 30th sample triggers, using samples 1-30
        assert_eq!(evaluations.len(), 1);
        let first = &evaluations[0];
        assert!((first.mean_ear.unwrap() - 0.225).abs() < 1e-4);
        assert_eq!(first.blink_count, 15);
        assert_eq!(first.blink_rate_per_minute, 15.0);
        assert_eq!(first.state, Some(CognitiveState::Neutral));
        assert_eq!(classifier.current_state(), Some(CognitiveState::Neutral));

        let stats = first.window_stats.unwrap();
        assert!((stats.jitter - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_second_periodic_evaluation_uses_next_samples() {
        let mut classifier = EyeStateClassifier::new(ClassifierConfig::default()).unwrap();
        let mut evaluations = Vec::new();

        for i in 0..60 {
            let ear = if i < 30 { 0.30 } else { 0.12 };
            let analysis = classifier.process(&frame(i, ear));
            if analysis.evaluated {
                evaluations.push((i, analysis));
            }
        }

        assert_eq!(evaluations.len(), 2);
        let (at, first) = &evaluations[0];
        assert_eq!(*at, 29);
        assert_eq!(first.state, Some(CognitiveState::Focus));

        // Samples 31-60 only: nothing from the open-eyed first half remains
        let (at, second) = &evaluations[1];
        assert_eq!(*at, 59);
        assert!((second.mean_ear.unwrap() - 0.12).abs() < 1e-5);
        let stats = second.window_stats.unwrap();
        assert!((stats.max - 0.12).abs() < 1e-5);
        assert_eq!(second.state, Some(CognitiveState::Fatigue));
    }

    #[test]
    fn test_every_frame_cadence() {
        let config = ClassifierConfig {
            cadence: EvaluationCadence::EveryFrame,
            ..Default::default()
        };
        let mut classifier = EyeStateClassifier::new(config).unwrap();
        let evaluated = (0..35)
            .map(|i| classifier.process(&frame(i, 0.3)).evaluated)
            .filter(|&e| e)
            .count();
        assert_eq!(evaluated, 6);
    }

    #[test]
    fn test_missing_detection_keeps_last_state() {
        let mut classifier = EyeStateClassifier::new(ClassifierConfig::default()).unwrap();
        for i in 0..30 {
            classifier.process(&frame(i, 0.12));
        }
        assert_eq!(classifier.current_state(), Some(CognitiveState::Fatigue));

        let analysis = classifier.process(&FrameObservation::missing(31 * FRAME_MS));
        assert!(!analysis.face_detected);
        assert!(!analysis.evaluated);
        assert_eq!(analysis.state, Some(CognitiveState::Fatigue));
        assert_eq!(classifier.session().window.total_recorded(), 30);
        assert_eq!(classifier.session().missed_frames, 1);
    }

    #[test]
    fn test_high_blink_rate_is_distraction() {
        let config = ClassifierConfig {
            cadence: EvaluationCadence::EveryFrame,
            ..Default::default()
        };
        let mut classifier = EyeStateClassifier::new(config).unwrap();
        // Mostly wide open with frequent closed frames: mean stays above 0.18
        for i in 0..30 {
            let ear = if i % 3 == 0 { 0.20 } else { 0.40 };
            classifier.process(&frame(i, ear));
        }
        assert_eq!(classifier.current_state(), Some(CognitiveState::Focus));

        let mut last = None;
        for i in 30..60 {
            let ear = if i % 3 == 0 { 0.40 } else { 0.20 };
            last = Some(classifier.process(&frame(i, ear)));
        }
        let last = last.unwrap();
        assert!(last.blink_rate_per_minute > 25.0);
        assert_eq!(last.state, Some(CognitiveState::Distraction));
    }

    #[test]
    fn test_expression_reported_when_enabled() {
        let config = ClassifierConfig {
            detect_expression: true,
            ..Default::default()
        };
        let mut classifier = EyeStateClassifier::new(config).unwrap();
        let analysis = classifier.process(&frame(0, 0.3));
        assert!(analysis.expression.is_some());

        let mut plain = EyeStateClassifier::new(ClassifierConfig::default()).unwrap();
        assert_eq!(plain.process(&frame(0, 0.3)).expression, None);
    }

    #[test]
    fn test_reset_clears_session() {
        let mut classifier = EyeStateClassifier::new(ClassifierConfig::default()).unwrap();
        for i in 0..30 {
            classifier.process(&frame(i, 0.3));
        }
        classifier.reset();
        assert_eq!(classifier.current_state(), None);
        assert!(classifier.session().window.is_empty());
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = ClassifierConfig {
            window_size: 0,
            ..Default::default()
        };
        assert!(EyeStateClassifier::new(config).is_err());
    }
}
