//! Deterministic eligibility checks that can veto a model prediction

use crate::catalog::PositionRequirement;
use crate::profile::{CandidateProfile, EducationLevel};
use crate::taxonomy::{SkillId, SkillTaxonomy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleVerdict {
    Pass,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleFailure {
    MissingRequiredSkill { skill: SkillId },
    InsufficientExperience { required: f64, actual: f64 },
    InsufficientEducation { required: EducationLevel, actual: EducationLevel },
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleFailure::MissingRequiredSkill { skill } => write!(f, "missing required skill '{}'", skill),
            RuleFailure::InsufficientExperience { required, actual } => {
                write!(f, "{} years of experience, {} required", actual, required)
            }
            RuleFailure::InsufficientEducation { required, actual } => {
                write!(f, "education '{}' below required '{}'", actual, required)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    pub verdict: RuleVerdict,
    pub missing_required: Vec<SkillId>,
    /// Every failed check: missing skills first, then experience, then education
    pub failures: Vec<RuleFailure>,
}

impl RuleResult {
    pub fn passed(&self) -> bool {
        self.verdict == RuleVerdict::Pass
    }
}

/// Eligibility checks for one position: required skills, minimum years and
/// minimum education.
#[derive(Debug, Clone)]
pub struct RuleGate {
    taxonomy: Arc<SkillTaxonomy>,
}

impl RuleGate {
    pub fn new(taxonomy: Arc<SkillTaxonomy>) -> Self {
        Self { taxonomy }
    }

    /// Run every check. Missing skills are listed in taxonomy order.
    pub fn evaluate(&self, profile: &CandidateProfile, requirement: &PositionRequirement) -> RuleResult {
        let missing_required = self.taxonomy.sort_by_rank(
            requirement
                .required_skills
                .iter()
                .filter(|skill| !profile.has_skill(skill))
                .cloned(),
        );

        let mut failures: Vec<RuleFailure> = missing_required
            .iter()
            .map(|skill| RuleFailure::MissingRequiredSkill { skill: skill.clone() })
            .collect();

        if profile.total_years < requirement.min_years {
            failures.push(RuleFailure::InsufficientExperience {
                required: requirement.min_years,
                actual: profile.total_years,
            });
        }

        if profile.highest_degree < requirement.min_education {
            failures.push(RuleFailure::InsufficientEducation {
                required: requirement.min_education,
                actual: profile.highest_degree,
            });
        }

        let verdict = if failures.is_empty() {
            RuleVerdict::Pass
        } else {
            RuleVerdict::Fail
        };

        RuleResult {
            verdict,
            missing_required,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;

    fn profile(skills: &[&str], years: f64, degree: EducationLevel) -> CandidateProfile {
        CandidateProfile {
            skills: skills.iter().map(|s| SkillId::new(*s)).collect(),
            total_years: years,
            highest_degree: degree,
            ..CandidateProfile::default()
        }
    }

    #[test]
    fn test_all_requirements_met() {
        let catalogs = Catalogs::builtin().unwrap();
        let requirement = catalogs.positions.get("devops").unwrap();
        let candidate = profile(&["linux", "docker", "cloud"], 2.0, EducationLevel::Bachelor);

        let result = RuleGate::new(catalogs.taxonomy.clone()).evaluate(&candidate, requirement);
        assert!(result.passed());
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_every_failure_is_reported_in_order() {
        let catalogs = Catalogs::builtin().unwrap();
        let requirement = catalogs.positions.get("data_science").unwrap();
        let candidate = profile(&["sql"], 1.0, EducationLevel::Associate);

        let result = RuleGate::new(catalogs.taxonomy.clone()).evaluate(&candidate, requirement);
        assert_eq!(result.verdict, RuleVerdict::Fail);
        assert_eq!(result.missing_required, vec![SkillId::new("python"), SkillId::new("statistics")]);
        assert_eq!(result.failures.len(), 4);
        assert!(matches!(result.failures[2], RuleFailure::InsufficientExperience { .. }));
        assert!(matches!(result.failures[3], RuleFailure::InsufficientEducation { .. }));
    }

    #[test]
    fn test_failure_messages() {
        let failure = RuleFailure::InsufficientEducation {
            required: EducationLevel::Bachelor,
            actual: EducationLevel::None,
        };
        assert_eq!(failure.to_string(), "education 'none' below required 'bachelor'");
    }
}
