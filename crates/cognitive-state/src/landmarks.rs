//! Face-mesh landmarks and eye-aspect-ratio geometry

use crate::CognitiveError;
use serde::{Deserialize, Serialize};

/// Minimum number of points in a face-mesh landmark set
pub const MIN_LANDMARKS: usize = 468;

/// Normalized 2D image coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance
    pub fn distance(&self, other: &Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One frame's landmarks. Guaranteed to hold at least 468 finite points.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Point2>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point2>) -> Result<Self, CognitiveError> {
        if points.len() < MIN_LANDMARKS {
            return Err(CognitiveError::MalformedLandmarks(format!(
                "expected at least {MIN_LANDMARKS} points, got {}",
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(CognitiveError::MalformedLandmarks(format!(
                "non-finite coordinate at index {i}"
            )));
        }
        Ok(Self { points })
    }

    pub fn get(&self, index: usize) -> Result<Point2, CognitiveError> {
        self.points
            .get(index)
            .copied()
            .ok_or(CognitiveError::KeypointsMissing(index))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }
}

/// Contour indices of one eye: `[outer, top1, top2, inner, bot2, bot1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeIndices(pub [usize; 6]);

impl EyeIndices {
    pub fn outer(&self) -> usize {
        self.0[0]
    }
    pub fn top(&self) -> usize {
        self.0[1]
    }
    pub fn inner(&self) -> usize {
        self.0[3]
    }
    pub fn bottom(&self) -> usize {
        self.0[5]
    }
}

/// Canonical face-mesh left eye contour
pub const LEFT_EYE: EyeIndices = EyeIndices([33, 160, 158, 133, 153, 144]);

/// Canonical face-mesh right eye contour
pub const RIGHT_EYE: EyeIndices = EyeIndices([362, 385, 387, 263, 373, 380]);

/// Eye aspect ratio: lid opening (top1 to bot1) over corner width (outer to inner).
///
/// Returns exactly `0.0` when the corners coincide, so an occluded or
/// degenerate face never yields NaN or infinity.
pub fn compute_ear(landmarks: &LandmarkSet, eye: &EyeIndices) -> Result<f32, CognitiveError> {
    let vertical = landmarks.get(eye.top())?.distance(&landmarks.get(eye.bottom())?);
    let horizontal = landmarks.get(eye.outer())?.distance(&landmarks.get(eye.inner())?);

    if horizontal == 0.0 {
        return Ok(0.0);
    }
    Ok(vertical / horizontal)
}

/// Mean of the left and right eye ratios
pub fn combined_ear(landmarks: &LandmarkSet) -> Result<f32, CognitiveError> {
    let left = compute_ear(landmarks, &LEFT_EYE)?;
    let right = compute_ear(landmarks, &RIGHT_EYE)?;
    Ok((left + right) / 2.0)
}

/// Synthetic mesh whose eyes have exactly the given aspect ratios.
/// Used for calibration runs and tests; every other point sits at the centre.
pub fn synthetic_mesh(left_ear: f32, right_ear: f32) -> Vec<Point2> {
    let mut points = vec![Point2::new(0.5, 0.5); MIN_LANDMARKS];
    place_eye(&mut points, &LEFT_EYE, 0.30, 0.40, left_ear);
    place_eye(&mut points, &RIGHT_EYE, 0.60, 0.40, right_ear);
    points
}

fn place_eye(points: &mut [Point2], eye: &EyeIndices, x0: f32, y: f32, ear: f32) {
    let width = 0.10;
    points[eye.outer()] = Point2::new(x0, y);
    points[eye.inner()] = Point2::new(x0 + width, y);
    let cx = x0 + width / 2.0;
    points[eye.top()] = Point2::new(cx, y - ear * width / 2.0);
    points[eye.bottom()] = Point2::new(cx, y + ear * width / 2.0);
}
