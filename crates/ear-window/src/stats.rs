//! Spread of the EAR window

use serde::{Deserialize, Serialize};

/// Spread of the samples behind one window mean
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub min: f32,
    pub max: f32,
    /// Population standard deviation
    pub std_dev: f32,
    /// Mean absolute step between consecutive samples. High values mean the
    /// lids moved a lot inside the window even if the mean looks calm.
    pub jitter: f32,
}

impl WindowStats {
    /// `None` for an empty window
    pub fn from_samples<I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
        I::IntoIter: Clone,
    {
        let iter = samples.into_iter();
        let mut count = 0usize;
        let mut sum = 0.0f32;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut steps = 0.0f32;
        let mut prev: Option<f32> = None;

        for ear in iter.clone() {
            count += 1;
            sum += ear;
            min = min.min(ear);
            max = max.max(ear);
            if let Some(p) = prev {
                steps += (ear - p).abs();
            }
            prev = Some(ear);
        }
        if count == 0 {
            return None;
        }

        let mean = sum / count as f32;
        let variance = iter.map(|ear| (ear - mean).powi(2)).sum::<f32>() / count as f32;
        let jitter = if count > 1 { steps / (count - 1) as f32 } else { 0.0 };

        Some(Self {
            min,
            max,
            std_dev: variance.sqrt(),
            jitter,
        })
    }

    pub fn range(&self) -> f32 {
        self.max - self.min
    }
}
