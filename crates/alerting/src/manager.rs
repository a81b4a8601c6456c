//! Alert Manager Implementation

use cognitive_state::CognitiveState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Alert configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Minimum time between two alerts of the same kind (milliseconds)
    pub cooldown_ms: u64,
    /// Raise an alert for distraction, not only for fatigue
    pub alert_on_distraction: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 60_000,
            alert_on_distraction: true,
        }
    }
}

/// Alert kinds raised from cognitive state evaluations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CognitiveAlert {
    Drowsiness,
    ExcessiveBlinking,
}

impl CognitiveAlert {
    /// Map an evaluated state to its alert, if it has one
    pub fn from_state(state: CognitiveState) -> Option<Self> {
        match state {
            CognitiveState::Fatigue => Some(CognitiveAlert::Drowsiness),
            CognitiveState::Distraction => Some(CognitiveAlert::ExcessiveBlinking),
            CognitiveState::Focus | CognitiveState::Neutral => None,
        }
    }
}

/// State of an alert
#[derive(Debug, Clone, PartialEq)]
pub struct AlertState {
    /// Frame timestamp this alert last fired at
    pub last_fired_ms: u64,
    /// Number of times fired
    pub fire_count: usize,
    /// Whether alert is acknowledged
    pub acknowledged: bool,
}

/// Alert manager for deduplication
pub struct AlertManager {
    config: AlertConfig,
    states: HashMap<CognitiveAlert, AlertState>,
    suppressed: usize,
}

impl AlertManager {
    pub fn new(config: AlertConfig) -> Self {
        info!("Creating alert manager with config: {:?}", config);
        Self {
            config,
            states: HashMap::new(),
            suppressed: 0,
        }
    }

    /// Check if an alert should fire at `now_ms`
    pub fn should_fire(&self, alert: CognitiveAlert, now_ms: u64) -> bool {
        if alert == CognitiveAlert::ExcessiveBlinking && !self.config.alert_on_distraction {
            return false;
        }

        if let Some(state) = self.states.get(&alert) {
            if now_ms.saturating_sub(state.last_fired_ms) < self.config.cooldown_ms {
                debug!("Alert {:?} suppressed: in cooldown period", alert);
                return false;
            }
        }

        true
    }

    /// Record that an alert was fired
    pub fn record_fire(&mut self, alert: CognitiveAlert, now_ms: u64) {
        let state = self.states.entry(alert).or_insert(AlertState {
            last_fired_ms: now_ms,
            fire_count: 0,
            acknowledged: false,
        });

        state.last_fired_ms = now_ms;
        state.fire_count += 1;
        state.acknowledged = false;

        info!("Alert recorded: {:?} (count: {})", alert, state.fire_count);
    }

    /// Fire the alert for `state` unless it is deduplicated. Returns the fired alert.
    pub fn observe(&mut self, state: CognitiveState, now_ms: u64) -> Option<CognitiveAlert> {
        let alert = CognitiveAlert::from_state(state)?;
        if self.should_fire(alert, now_ms) {
            self.record_fire(alert, now_ms);
            Some(alert)
        } else {
            self.suppressed += 1;
            None
        }
    }

    pub fn acknowledge(&mut self, alert: CognitiveAlert) -> bool {
        if let Some(state) = self.states.get_mut(&alert) {
            state.acknowledged = true;
            info!("Alert acknowledged: {:?}", alert);
            true
        } else {
            false
        }
    }

    /// Unacknowledged alerts
    pub fn pending(&self) -> Vec<(CognitiveAlert, &AlertState)> {
        self.states
            .iter()
            .filter(|(_, state)| !state.acknowledged)
            .map(|(k, v)| (*k, v))
            .collect()
    }

    pub fn fire_count(&self, alert: CognitiveAlert) -> usize {
        self.states.get(&alert).map_or(0, |s| s.fire_count)
    }

    /// Alerts dropped by deduplication
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.suppressed = 0;
    }
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}
