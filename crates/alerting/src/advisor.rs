//! Instructor-panel advice rules

use serde::{Deserialize, Serialize};

/// Quality of the meal eaten before class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MealQuality {
    #[default]
    Adequate,
    Inadequate,
}

/// Indicators for one student, levels in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSnapshot {
    pub focus_level: f32,
    pub fatigue_level: f32,
    pub pre_class_meal: MealQuality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudentAlert {
    LowFocus,
    HighFatigue,
    InadequateMeal,
}

impl StudentAlert {
    pub fn message(&self) -> &'static str {
        match self {
            StudentAlert::LowFocus => "Low focus level detected.",
            StudentAlert::HighFatigue => "High fatigue level.",
            StudentAlert::InadequateMeal => "Inadequate meal may impact performance.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suggestion {
    ActiveBreak,
    ContentReview,
    NutritionGuidance,
}

impl Suggestion {
    pub fn message(&self) -> &'static str {
        match self {
            Suggestion::ActiveBreak => "Suggest an active break or a playful activity.",
            Suggestion::ContentReview => "Recommend reviewing the content or a multimodal approach.",
            Suggestion::NutritionGuidance => "Give guidance about eating before class.",
        }
    }
}

/// Alert and suggestion thresholds. Suggestions kick in slightly before alerts
/// for fatigue and slightly after for focus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorThresholds {
    pub low_focus_alert: f32,
    pub high_fatigue_alert: f32,
    pub break_suggestion: f32,
    pub review_suggestion: f32,
}

impl Default for AdvisorThresholds {
    fn default() -> Self {
        Self {
            low_focus_alert: 0.45,
            high_fatigue_alert: 0.65,
            break_suggestion: 0.6,
            review_suggestion: 0.4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub alerts: Vec<StudentAlert>,
    pub suggestions: Vec<Suggestion>,
}

impl Advice {
    /// No critical alert
    pub fn is_clear(&self) -> bool {
        self.alerts.is_empty()
    }
}

pub fn advise(snapshot: &StudentSnapshot, thresholds: &AdvisorThresholds) -> Advice {
    let mut advice = Advice::default();
    let inadequate_meal = snapshot.pre_class_meal == MealQuality::Inadequate;

    if snapshot.focus_level < thresholds.low_focus_alert {
        advice.alerts.push(StudentAlert::LowFocus);
    }
    if snapshot.fatigue_level > thresholds.high_fatigue_alert {
        advice.alerts.push(StudentAlert::HighFatigue);
    }
    if inadequate_meal {
        advice.alerts.push(StudentAlert::InadequateMeal);
    }

    if snapshot.fatigue_level > thresholds.break_suggestion {
        advice.suggestions.push(Suggestion::ActiveBreak);
    }
    if snapshot.focus_level < thresholds.review_suggestion {
        advice.suggestions.push(Suggestion::ContentReview);
    }
    if inadequate_meal {
        advice.suggestions.push(Suggestion::NutritionGuidance);
    }

    advice
}
