//! Facial expression heuristic from landmark proportions
//!
//! All distances are normalized by the horizontal span between the outer eye
//! corners (landmarks 33 and 263), so the rules hold at any face scale.

use crate::landmarks::LandmarkSet;
use crate::CognitiveError;
use serde::{Deserialize, Serialize};

const OUTER_LEFT_EYE: usize = 33;
const OUTER_RIGHT_EYE: usize = 263;
const LEFT_LID_TOP: usize = 159;
const LEFT_LID_BOTTOM: usize = 145;
const RIGHT_LID_TOP: usize = 386;
const RIGHT_LID_BOTTOM: usize = 374;
const LIP_TOP: usize = 13;
const LIP_BOTTOM: usize = 14;
const MOUTH_LEFT: usize = 61;
const MOUTH_RIGHT: usize = 291;
const LEFT_BROW: usize = 70;
const RIGHT_BROW: usize = 300;

/// Detected facial expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Expression {
    Happy,
    Sad,
    Surprised,
    Angry,
    #[default]
    Neutral,
}

/// Normalized facial proportions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceProportions {
    pub eye_opening: f32,
    pub mouth_opening: f32,
    pub mouth_width: f32,
    /// Mean brow height in image coordinates (not normalized)
    pub brow_height: f32,
}

impl FaceProportions {
    /// `None` when the eye corners share an x coordinate
    pub fn measure(landmarks: &LandmarkSet) -> Result<Option<Self>, CognitiveError> {
        let span = (landmarks.get(OUTER_LEFT_EYE)?.x - landmarks.get(OUTER_RIGHT_EYE)?.x).abs();
        if span == 0.0 {
            return Ok(None);
        }

        let vertical = |a: usize, b: usize| -> Result<f32, CognitiveError> {
            Ok((landmarks.get(a)?.y - landmarks.get(b)?.y).abs())
        };

        let eyes = (vertical(LEFT_LID_TOP, LEFT_LID_BOTTOM)? + vertical(RIGHT_LID_TOP, RIGHT_LID_BOTTOM)?) / 2.0;
        let mouth_width = (landmarks.get(MOUTH_LEFT)?.x - landmarks.get(MOUTH_RIGHT)?.x).abs();

        Ok(Some(Self {
            eye_opening: eyes / span,
            mouth_opening: vertical(LIP_TOP, LIP_BOTTOM)? / span,
            mouth_width: mouth_width / span,
            brow_height: (landmarks.get(LEFT_BROW)?.y + landmarks.get(RIGHT_BROW)?.y) / 2.0,
        }))
    }
}

/// Expression rule thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionRules {
    pub surprised_eyes: f32,
    pub surprised_mouth: f32,
    pub happy_width: f32,
    pub happy_mouth: f32,
    pub angry_eyes: f32,
    pub angry_brow: f32,
    pub sad_width: f32,
    pub sad_mouth: f32,
}

impl Default for ExpressionRules {
    fn default() -> Self {
        Self {
            surprised_eyes: 0.30,
            surprised_mouth: 0.32,
            happy_width: 0.75,
            happy_mouth: 0.25,
            angry_eyes: 0.18,
            angry_brow: 0.38,
            sad_width: 0.55,
            sad_mouth: 0.18,
        }
    }
}

impl ExpressionRules {
    pub fn classify(&self, p: &FaceProportions) -> Expression {
        if p.eye_opening > self.surprised_eyes && p.mouth_opening > self.surprised_mouth {
            Expression::Surprised
        } else if p.mouth_width > self.happy_width && p.mouth_opening < self.happy_mouth {
            Expression::Happy
        } else if p.eye_opening < self.angry_eyes && p.brow_height < self.angry_brow {
            Expression::Angry
        } else if p.mouth_width < self.sad_width && p.mouth_opening < self.sad_mouth {
            Expression::Sad
        } else {
            Expression::Neutral
        }
    }

    /// Degenerate or incomplete faces fall back to `Neutral`
    pub fn detect(&self, landmarks: &LandmarkSet) -> Expression {
        match FaceProportions::measure(landmarks) {
            Ok(Some(p)) => self.classify(&p),
            Ok(None) | Err(_) => Expression::Neutral,
        }
    }
}
