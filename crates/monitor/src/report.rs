//! Session report

use alerting::{advise, Advice, AdvisorThresholds, CognitiveAlert, MealQuality, StudentSnapshot};
use chrono::{DateTime, Utc};
use cognitive_state::{CognitiveState, FrameAnalysis, WindowStats};
use serde::Serialize;
use std::collections::BTreeMap;

/// Alert raised during the session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub timestamp_ms: u64,
    pub alert: CognitiveAlert,
}

/// Counters collected over one monitoring session
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub started_at: DateTime<Utc>,
    pub frames: u64,
    pub detections: u64,
    pub evaluations: u64,
    /// Evaluations per state label
    pub state_counts: BTreeMap<String, u64>,
    /// Frames per expression, when expression detection is on
    pub expression_counts: BTreeMap<String, u64>,
    pub alerts: Vec<AlertEvent>,
    /// Window spread at the most recent evaluation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_window_stats: Option<WindowStats>,
    /// Last frame analysis seen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<FrameAnalysis>,
}

impl SessionReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            frames: 0,
            detections: 0,
            evaluations: 0,
            state_counts: BTreeMap::new(),
            expression_counts: BTreeMap::new(),
            alerts: Vec::new(),
            last_window_stats: None,
            last: None,
        }
    }

    pub fn record(&mut self, analysis: &FrameAnalysis) {
        self.frames += 1;
        if analysis.face_detected {
            self.detections += 1;
        }
        if let Some(expression) = analysis.expression {
            *self.expression_counts.entry(format!("{expression:?}")).or_insert(0) += 1;
        }
        if analysis.evaluated {
            if let Some(state) = analysis.state {
                self.evaluations += 1;
                *self.state_counts.entry(state.to_string()).or_insert(0) += 1;
            }
            if analysis.window_stats.is_some() {
                self.last_window_stats = analysis.window_stats;
            }
        }
        self.last = Some(analysis.clone());
    }

    pub fn record_alert(&mut self, timestamp_ms: u64, alert: CognitiveAlert) {
        self.alerts.push(AlertEvent { timestamp_ms, alert });
    }

    pub fn count(&self, state: CognitiveState) -> u64 {
        self.state_counts.get(&state.to_string()).copied().unwrap_or(0)
    }

    /// Share of evaluations that produced `state`
    pub fn proportion(&self, state: CognitiveState) -> f32 {
        if self.evaluations == 0 {
            return 0.0;
        }
        self.count(state) as f32 / self.evaluations as f32
    }

    /// Most frequent state; ties go to the more severe label
    pub fn dominant_state(&self) -> Option<CognitiveState> {
        CognitiveState::ALL
            .iter()
            .copied()
            .filter(|&s| self.count(s) > 0)
            .fold(None, |best: Option<CognitiveState>, s| match best {
                Some(b) if self.count(b) >= self.count(s) => Some(b),
                _ => Some(s),
            })
    }

    /// Focus and fatigue shares as instructor-panel indicators
    pub fn student_snapshot(&self, meal: MealQuality) -> StudentSnapshot {
        StudentSnapshot {
            focus_level: self.proportion(CognitiveState::Focus),
            fatigue_level: self.proportion(CognitiveState::Fatigue),
            pre_class_meal: meal,
        }
    }
}

impl Default for SessionReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Report plus advice, printed at the end of a run
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub report: SessionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_state: Option<CognitiveState>,
    pub snapshot: StudentSnapshot,
    pub advice: Advice,
}

impl SessionSummary {
    pub fn new(report: SessionReport, meal: MealQuality, thresholds: &AdvisorThresholds) -> Self {
        let snapshot = report.student_snapshot(meal);
        let advice = advise(&snapshot, thresholds);
        Self {
            dominant_state: report.dominant_state(),
            report,
            snapshot,
            advice,
        }
    }
}
