//! Sliding Window Implementation

use crate::{WindowError, WindowStats};
use std::collections::VecDeque;

/// Default window size (30 samples = ~1 s at 30 fps)
pub const DEFAULT_WINDOW_SIZE: usize = 30;

/// Append `sample` to `history`, dropping the oldest entries beyond `max_len`.
pub fn record_sample(history: &mut VecDeque<f32>, sample: f32, max_len: usize) {
    history.push_back(sample);
    while history.len() > max_len {
        history.pop_front();
    }
}

/// Sliding window of EAR samples (oldest evicted first)
#[derive(Debug, Clone, PartialEq)]
pub struct EarWindow {
    /// Samples, oldest at the front
    samples: VecDeque<f32>,
    /// Maximum number of retained samples
    capacity: usize,
    /// Total samples recorded since creation or last clear
    total_recorded: usize,
}

impl EarWindow {
    /// Create a new window with given capacity
    pub fn new(capacity: usize) -> Result<Self, WindowError> {
        if capacity == 0 {
            return Err(WindowError::ZeroCapacity);
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
            total_recorded: 0,
        })
    }

    /// Create a window with default capacity (30 samples)
    pub fn with_default_capacity() -> Self {
        Self {
            samples: VecDeque::with_capacity(DEFAULT_WINDOW_SIZE + 1),
            capacity: DEFAULT_WINDOW_SIZE,
            total_recorded: 0,
        }
    }

    /// Push a sample (evicts oldest if full)
    pub fn push(&mut self, sample: f32) {
        record_sample(&mut self.samples, sample, self.capacity);
        self.total_recorded += 1;
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check if the window holds `capacity` samples
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples recorded so far, including evicted ones
    pub fn total_recorded(&self) -> usize {
        self.total_recorded
    }

    /// Mean of the window, only once it is full
    pub fn mean(&self) -> Option<f32> {
        if !self.is_full() {
            return None;
        }
        let sum: f32 = self.samples.iter().sum();
        Some(sum / self.samples.len() as f32)
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    /// Iterate samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    /// Spread of the window, only once it is full (same gate as `mean`)
    pub fn stats(&self) -> Option<WindowStats> {
        if !self.is_full() {
            return None;
        }
        WindowStats::from_samples(self.samples.iter().copied())
    }

    /// Drop all samples (new session)
    pub fn clear(&mut self) {
        self.samples.clear();
        self.total_recorded = 0;
    }
}

impl Default for EarWindow {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_record_sample_evicts_oldest() {
        let mut history = VecDeque::new();
        for i in 1..=40 {
            record_sample(&mut history, i as f32, 30);
        }

        assert_eq!(history.len(), 30);
        let expected: Vec<f32> = (11..=40).map(|i| i as f32).collect();
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_mean_only_when_full() {
        let mut window = EarWindow::new(3).unwrap();
        window.push(0.1);
        window.push(0.2);
        assert_eq!(window.mean(), None);

        window.push(0.3);
        let mean = window.mean().unwrap();
        assert!((mean - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_stats_follow_mean_gate() {
        let mut window = EarWindow::new(4).unwrap();
        for ear in [0.30, 0.10, 0.30] {
            window.push(ear);
        }
        assert_eq!(window.stats(), None);

        window.push(0.10);
        let stats = window.stats().unwrap();
        assert_eq!(stats.min, 0.10);
        assert_eq!(stats.max, 0.30);
        assert!((stats.jitter - 0.20).abs() < 1e-6);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(EarWindow::new(0), Err(WindowError::ZeroCapacity));
    }

    #[test]
    fn test_total_recorded_and_clear() {
        let mut window = EarWindow::with_default_capacity();
        for _ in 0..45 {
            window.push(0.3);
        }
        assert_eq!(window.len(), DEFAULT_WINDOW_SIZE);
        assert_eq!(window.total_recorded(), 45);

        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.total_recorded(), 0);
    }

    proptest! {
        #[test]
        fn prop_window_never_exceeds_capacity(
            capacity in 1usize..64,
            samples in proptest::collection::vec(0.0f32..1.0, 0..200),
        ) {
            let mut window = EarWindow::new(capacity).unwrap();
            for &s in &samples {
                window.push(s);
                prop_assert!(window.len() <= capacity);
            }
            if let Some(last) = samples.last() {
                prop_assert_eq!(window.latest(), Some(*last));
            }
        }
    }
}
