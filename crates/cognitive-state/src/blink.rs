//! Blink counting and blink-rate policies

use crate::config::BlinkRatePolicy;
use std::collections::VecDeque;

const MS_PER_MINUTE: f32 = 60_000.0;

/// Counts samples below the sensitivity threshold
#[derive(Debug, Clone)]
pub struct BlinkTracker {
    threshold: f32,
    policy: BlinkRatePolicy,
    /// Monotonic count since session start
    total: u64,
    /// Timestamps of counted samples still inside the trailing window
    recent: VecDeque<u64>,
    session_start_ms: Option<u64>,
}

impl BlinkTracker {
    pub fn new(threshold: f32, policy: BlinkRatePolicy) -> Self {
        Self {
            threshold,
            policy,
            total: 0,
            recent: VecDeque::new(),
            session_start_ms: None,
        }
    }

    /// Record one EAR sample. Returns true if it counted as a blink.
    pub fn observe(&mut self, ear: f32, timestamp_ms: u64) -> bool {
        self.session_start_ms.get_or_insert(timestamp_ms);

        let blinked = ear < self.threshold;
        if blinked {
            self.total += 1;
            if let BlinkRatePolicy::TrailingWindow { .. } = self.policy {
                self.recent.push_back(timestamp_ms);
            }
        }

        if let BlinkRatePolicy::TrailingWindow { window_ms } = self.policy {
            let cutoff = timestamp_ms.saturating_sub(window_ms);
            while self.recent.front().is_some_and(|&t| t < cutoff) {
                self.recent.pop_front();
            }
        }

        blinked
    }

    /// Blinks per minute as of `now_ms`
    pub fn rate_per_minute(&self, now_ms: u64) -> f32 {
        match self.policy {
            BlinkRatePolicy::TrailingWindow { window_ms } => {
                if window_ms == 0 {
                    return 0.0;
                }
                let cutoff = now_ms.saturating_sub(window_ms);
                let count = self.recent.iter().filter(|&&t| t >= cutoff).count();
                count as f32 * MS_PER_MINUTE / window_ms as f32
            }
            BlinkRatePolicy::SessionAverage => {
                let start = match self.session_start_ms {
                    Some(start) => start,
                    None => return 0.0,
                };
                let minutes = (now_ms.saturating_sub(start) as f32 / MS_PER_MINUTE).max(1.0);
                self.total as f32 / minutes
            }
        }
    }

    /// Total blinks since session start
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn reset(&mut self) {
        self.total = 0;
        self.recent.clear();
        self.session_start_ms = None;
    }
}
