//! Fixed-shape numeric features for the suitability model

use crate::catalog::PositionRequirement;
use crate::profile::CandidateProfile;
use serde::{Deserialize, Serialize};

/// Bumped whenever a feature is added, removed or reordered.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

pub const FEATURE_NAMES: [&str; 11] = [
    "required_present",
    "required_ratio",
    "preferred_present",
    "preferred_ratio",
    "years_delta",
    "education_delta",
    "skill_count",
    "total_years",
    "education_rank",
    "certification_count",
    "project_count",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

const MAX_YEARS_DELTA: f64 = 20.0;
const MAX_TOTAL_YEARS: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub schema_version: u32,
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .and_then(|index| self.values.get(index).copied())
    }

    /// Little-endian encoding of the values; identical inputs give identical bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build the feature vector for one candidate against one position.
pub fn build_features(profile: &CandidateProfile, requirement: &PositionRequirement) -> FeatureVector {
    let required_present = requirement
        .required_skills
        .iter()
        .filter(|skill| profile.has_skill(skill))
        .count();

    let preferred = requirement.preferred_skills();
    let preferred_present = preferred.iter().filter(|skill| profile.has_skill(skill)).count();

    let values = vec![
        required_present as f64,
        ratio(required_present, requirement.required_skills.len()),
        preferred_present as f64,
        ratio(preferred_present, preferred.len()),
        (profile.total_years - requirement.min_years).clamp(-MAX_YEARS_DELTA, MAX_YEARS_DELTA),
        (profile.highest_degree.rank() - requirement.min_education.rank()) as f64,
        profile.skills.len() as f64,
        profile.total_years.clamp(0.0, MAX_TOTAL_YEARS),
        profile.highest_degree.rank() as f64,
        profile.certifications.len() as f64,
        profile.projects.len() as f64,
    ];

    FeatureVector {
        schema_version: FEATURE_SCHEMA_VERSION,
        values,
    }
}

fn ratio(present: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        present as f64 / total as f64
    }
}
