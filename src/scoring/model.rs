//! Suitability model boundary.
//!
//! The classifier is injected as `Arc<dyn SuitabilityModel>`; the engine only
//! sees a label and a confidence. [`LogisticModel`] is the bundled adapter for
//! weights exported from an offline training run.

use crate::error::{AdvisorError, Result};
use crate::scoring::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
use log::info;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitabilityLabel {
    Suitable,
    NotSuitable,
}

impl fmt::Display for SuitabilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuitabilityLabel::Suitable => f.write_str("suitable"),
            SuitabilityLabel::NotSuitable => f.write_str("not suitable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub label: SuitabilityLabel,
    /// Probability of `label`, in `[0, 1]`
    pub confidence: f64,
}

/// A trained classifier over [`FeatureVector`]s.
///
/// Implementations must be deterministic for a given vector. Returning
/// [`AdvisorError::ModelUnavailable`] makes the engine fall back to the rule
/// verdict instead of failing the evaluation.
pub trait SuitabilityModel: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, features: &FeatureVector) -> Result<ModelOutput>;
}

/// Logistic regression: `p = sigmoid(w · x + b)`, `Suitable` when `p >= threshold`.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    weights: Array1<f64>,
    bias: f64,
    threshold: f64,
}

/// Weight file layout. Weights are keyed by feature name; absent features
/// get weight 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticWeights {
    pub schema_version: u32,
    pub bias: f64,
    #[serde(default)]
    pub threshold: Option<f64>,
    pub weights: BTreeMap<String, f64>,
}

impl LogisticModel {
    pub fn new(weights: Vec<f64>, bias: f64, threshold: f64) -> Result<Self> {
        if weights.len() != FEATURE_COUNT {
            return Err(AdvisorError::Configuration(format!(
                "model expects {} weights, got {}",
                FEATURE_COUNT,
                weights.len()
            )));
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AdvisorError::Configuration(format!(
                "model threshold {} outside [0, 1]",
                threshold
            )));
        }
        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(AdvisorError::Configuration("model weights must be finite".to_string()));
        }

        Ok(Self {
            weights: Array1::from(weights),
            bias,
            threshold,
        })
    }

    pub fn from_weights(definition: LogisticWeights, default_threshold: f64) -> Result<Self> {
        if definition.schema_version != FEATURE_SCHEMA_VERSION {
            return Err(AdvisorError::Configuration(format!(
                "model was trained on feature schema v{}, this build produces v{}",
                definition.schema_version, FEATURE_SCHEMA_VERSION
            )));
        }

        let mut weights = vec![0.0; FEATURE_COUNT];
        for (name, weight) in &definition.weights {
            let index = FEATURE_NAMES
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| AdvisorError::Configuration(format!("unknown model feature '{}'", name)))?;
            weights[index] = *weight;
        }

        Self::new(weights, definition.bias, definition.threshold.unwrap_or(default_threshold))
    }

    pub fn load(path: &Path, default_threshold: f64) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AdvisorError::Configuration(format!("{}: {}", path.display(), e)))?;
        let definition: LogisticWeights = toml::from_str(&content)
            .map_err(|e| AdvisorError::Configuration(format!("{}: {}", path.display(), e)))?;
        let model = Self::from_weights(definition, default_threshold)?;
        info!("Loaded logistic model from {}", path.display());
        Ok(model)
    }

    pub fn probability(&self, features: &FeatureVector) -> Result<f64> {
        if features.schema_version != FEATURE_SCHEMA_VERSION || features.len() != self.weights.len() {
            return Err(AdvisorError::ModelUnavailable(format!(
                "feature vector v{} with {} values does not match the model",
                features.schema_version,
                features.len()
            )));
        }

        let x = Array1::from(features.values.clone());
        let z = self.weights.dot(&x) + self.bias;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl SuitabilityModel for LogisticModel {
    fn name(&self) -> &str {
        "logistic"
    }

    fn score(&self, features: &FeatureVector) -> Result<ModelOutput> {
        let p = self.probability(features)?;
        let output = if p >= self.threshold {
            ModelOutput {
                label: SuitabilityLabel::Suitable,
                confidence: p,
            }
        } else {
            ModelOutput {
                label: SuitabilityLabel::NotSuitable,
                confidence: 1.0 - p,
            }
        };
        Ok(output)
    }
}
