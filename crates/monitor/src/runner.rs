//! Frame-driven polling loop

use crate::report::{SessionReport, SessionSummary};
use crate::source::FrameSource;
use crate::{MonitorConfig, MonitorError};
use alerting::{AdvisorThresholds, AlertManager, MealQuality};
use cognitive_state::{EyeStateClassifier, FrameAnalysis, FrameObservation};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{info, warn};

/// Owns the classifier, alert manager, and report for one session.
/// Not shared across tasks; the loop is the only writer.
pub struct MonitorLoop {
    classifier: EyeStateClassifier,
    alerts: AlertManager,
    report: SessionReport,
    frame_interval: Duration,
    meal: MealQuality,
    advisor: AdvisorThresholds,
}

impl MonitorLoop {
    pub fn new(config: &MonitorConfig) -> Result<Self, MonitorError> {
        Ok(Self {
            classifier: EyeStateClassifier::new(config.classifier.clone())?,
            alerts: AlertManager::new(config.alerts.clone()),
            report: SessionReport::new(),
            frame_interval: Duration::from_millis(config.frame_interval_ms),
            meal: config.pre_class_meal,
            advisor: config.advisor,
        })
    }

    /// Process one frame synchronously
    pub fn step(&mut self, frame: &FrameObservation) -> FrameAnalysis {
        metrics::counter!("monitor_frames_total").increment(1);

        let analysis = self.classifier.process(frame);
        if !analysis.face_detected {
            metrics::counter!("monitor_detection_misses_total").increment(1);
        }

        if analysis.evaluated {
            metrics::counter!("monitor_evaluations_total").increment(1);
        }

        if analysis.evaluated && analysis.needs_attention() {
            if let Some((state, message)) = analysis.reading() {
                if let Some(alert) = self.alerts.observe(state, analysis.timestamp_ms) {
                    warn!(timestamp_ms = analysis.timestamp_ms, "{:?}: {}", alert, message);
                    self.report.record_alert(analysis.timestamp_ms, alert);
                }
            }
        }

        self.report.record(&analysis);
        analysis
    }

    /// Poll `source` until it is exhausted or `stop` is raised. The source is
    /// dropped (and its handle released) when the loop ends.
    pub async fn run<S: FrameSource>(&mut self, mut source: S, stop: &AtomicBool) -> Result<(), MonitorError> {
        info!("Starting monitor loop ({} ms per frame)", self.frame_interval.as_millis());

        while !stop.load(Ordering::Relaxed) {
            let Some(frame) = source.next_frame()? else {
                info!("Frame source exhausted");
                break;
            };

            self.step(&frame);

            // Yield even when unpaced; ctrl-c shares a current-thread runtime
            if self.frame_interval.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(self.frame_interval).await;
            }
        }

        if stop.load(Ordering::Relaxed) {
            info!("Monitor loop stopped");
        }
        info!(
            "Processed {} frames, {} evaluations, {} alerts",
            self.report.frames,
            self.report.evaluations,
            self.report.alerts.len()
        );
        Ok(())
    }

    pub fn report(&self) -> &SessionReport {
        &self.report
    }

    pub fn classifier(&self) -> &EyeStateClassifier {
        &self.classifier
    }

    /// Finish the session and attach advice
    pub fn summarize(self) -> SessionSummary {
        SessionSummary::new(self.report, self.meal, &self.advisor)
    }
}
