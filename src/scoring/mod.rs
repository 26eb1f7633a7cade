//! Hybrid suitability scoring: rule gate + injected model

pub mod features;
pub mod fusion;
pub mod model;
pub mod rules;

pub use features::{build_features, FeatureVector, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
pub use fusion::{ConfidenceBands, ModelStatus, PredictionResult, SuitabilityFusion};
pub use model::{LogisticModel, ModelOutput, SuitabilityLabel, SuitabilityModel};
pub use rules::{RuleFailure, RuleGate, RuleResult, RuleVerdict};

use crate::catalog::PositionRequirement;
use crate::error::AdvisorError;
use crate::profile::CandidateProfile;
use crate::taxonomy::SkillTaxonomy;
use log::{debug, warn};
use std::sync::Arc;

pub struct SuitabilityScorer {
    gate: RuleGate,
    model: Option<Arc<dyn SuitabilityModel>>,
    fusion: SuitabilityFusion,
}

impl SuitabilityScorer {
    pub fn new(taxonomy: Arc<SkillTaxonomy>, model: Option<Arc<dyn SuitabilityModel>>, bands: ConfidenceBands) -> Self {
        Self {
            gate: RuleGate::new(taxonomy),
            model,
            fusion: SuitabilityFusion::new(bands),
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn predict(&self, profile: &CandidateProfile, requirement: &PositionRequirement) -> PredictionResult {
        let rules = self.gate.evaluate(profile, requirement);
        let features = build_features(profile, requirement);

        let model_output = match &self.model {
            Some(model) => match model.score(&features) {
                Ok(output) if !(0.0..=1.0).contains(&output.confidence) => {
                    warn!("Model '{}' returned invalid confidence {}", model.name(), output.confidence);
                    Err(format!("invalid model confidence {}", output.confidence))
                }
                Ok(output) => {
                    debug!("Model '{}' scored {:?} for {}", model.name(), output, requirement.id);
                    Ok(output)
                }
                Err(AdvisorError::ModelUnavailable(reason)) => {
                    warn!("Model '{}' unavailable: {}", model.name(), reason);
                    Err(reason)
                }
                Err(e) => {
                    warn!("Model '{}' failed: {}", model.name(), e);
                    Err(e.to_string())
                }
            },
            None => Err("no model configured".to_string()),
        };

        let result = self.fusion.fuse(&requirement.id, rules, model_output);
        debug!(
            "Prediction for {}: {} ({:.2}), rules {:?}",
            requirement.id, result.label, result.confidence, result.rule_verdict
        );
        result
    }
}
