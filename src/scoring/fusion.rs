//! Combines the rule verdict with the model output into one prediction

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::scoring::model::{ModelOutput, SuitabilityLabel};
use crate::scoring::rules::{RuleFailure, RuleResult, RuleVerdict};
use serde::{Deserialize, Serialize};

/// Confidence thresholds for recommendation wording, `0 <= medium <= high <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBands {
    pub high: f64,
    pub medium: f64,
}

impl ConfidenceBands {
    pub fn from_config(config: &ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            high: config.high_confidence,
            medium: config.medium_confidence,
        })
    }
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        Self { high: 0.8, medium: 0.6 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ModelStatus {
    Available,
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub position_id: String,
    pub label: SuitabilityLabel,
    pub confidence: f64,
    pub rule_verdict: RuleVerdict,
    pub rule_failures: Vec<RuleFailure>,
    pub model_status: ModelStatus,
    pub recommendation_text: String,
}

impl PredictionResult {
    pub fn is_suitable(&self) -> bool {
        self.label == SuitabilityLabel::Suitable
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuitabilityFusion {
    bands: ConfidenceBands,
}

impl SuitabilityFusion {
    pub fn new(bands: ConfidenceBands) -> Self {
        Self { bands }
    }

    /// A failed rule check always yields `NotSuitable`; the model confidence
    /// is kept for information. A passed check defers to the model, and to
    /// the rule verdict alone when the model could not score.
    pub fn fuse(
        &self,
        position_id: &str,
        rules: RuleResult,
        model: std::result::Result<ModelOutput, String>,
    ) -> PredictionResult {
        let (model_status, output) = match model {
            Ok(output) => (ModelStatus::Available, Some(output)),
            Err(reason) => (ModelStatus::Unavailable(reason), None),
        };

        let (label, confidence, recommendation_text) = match (rules.verdict, output) {
            (RuleVerdict::Fail, output) => (
                SuitabilityLabel::NotSuitable,
                output.map_or(0.0, |o| o.confidence),
                rejection_text(&rules),
            ),
            (RuleVerdict::Pass, Some(output)) => {
                (output.label, output.confidence, self.recommendation_for(output))
            }
            (RuleVerdict::Pass, None) => (
                SuitabilityLabel::Suitable,
                0.0,
                "Meets all requirements - model unavailable, manual review advised".to_string(),
            ),
        };

        PredictionResult {
            position_id: position_id.to_string(),
            label,
            confidence: confidence.clamp(0.0, 1.0),
            rule_verdict: rules.verdict,
            rule_failures: rules.failures,
            model_status,
            recommendation_text,
        }
    }

    fn recommendation_for(&self, output: ModelOutput) -> String {
        let text = match output.label {
            SuitabilityLabel::NotSuitable => "Not recommended by model",
            SuitabilityLabel::Suitable if output.confidence >= self.bands.high => "Highly recommended",
            SuitabilityLabel::Suitable if output.confidence >= self.bands.medium => "Recommended with review",
            SuitabilityLabel::Suitable => "Borderline - manual review advised",
        };
        text.to_string()
    }
}

fn rejection_text(rules: &RuleResult) -> String {
    match rules.failures.first() {
        Some(RuleFailure::MissingRequiredSkill { skill }) => format!("Not suitable: missing required skill '{}'", skill),
        Some(failure) => format!("Not suitable: {}", failure),
        None => "Not suitable".to_string(),
    }
}
