//! Score Thresholds
//!
//! Fixed policy for turning a probability into label, score and risk band.
//! Not configurable.

use serde::{Deserialize, Serialize};

/// Probability at or above which a lead is High risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Probability at or above which a lead is at least Medium risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Strictly above this, the predicted label is "yes"
pub const POSITIVE_LABEL_THRESHOLD: f64 = 0.5;

/// Risk band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            RiskCategory::High
        } else if probability >= MEDIUM_RISK_THRESHOLD {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        }
    }
}

/// Will the lead subscribe?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionLabel {
    Yes,
    No,
}

impl PredictionLabel {
    pub fn from_probability(probability: f64) -> Self {
        if probability > POSITIVE_LABEL_THRESHOLD {
            PredictionLabel::Yes
        } else {
            PredictionLabel::No
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionLabel::Yes => "yes",
            PredictionLabel::No => "no",
        }
    }
}

/// 0-100 lead score. Halves round away from zero (0.125 -> 13).
pub fn score_from_probability(probability: f64) -> u8 {
    (probability.clamp(0.0, 1.0) * 100.0).round() as u8
}
