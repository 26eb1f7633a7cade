//! Skill gap between a candidate and a position

use crate::catalog::PositionRequirement;
use crate::profile::CandidateProfile;
use crate::taxonomy::{SkillId, SkillTaxonomy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Career level reported when no progression stage is reached.
pub const BEGINNER_LEVEL: &str = "beginner";

/// Share of a stage's skills a candidate needs to be placed at that stage.
const STAGE_MATCH_THRESHOLD: f64 = 70.0;

const REQUIRED_WEIGHT: f64 = 0.5;
const ADVANCED_WEIGHT: f64 = 0.3;
const TOOLS_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTier {
    Required,
    Advanced,
    Tools,
}

impl fmt::Display for SkillTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillTier::Required => f.write_str("required"),
            SkillTier::Advanced => f.write_str("advanced"),
            SkillTier::Tools => f.write_str("tools"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierCompletion {
    pub required: f64,
    pub advanced: f64,
    pub tools: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLevel {
    HighlyReady,
    ModeratelyReady,
    NeedsDevelopment,
    SignificantDevelopmentNeeded,
}

impl ReadinessLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ReadinessLevel::HighlyReady
        } else if score >= 60.0 {
            ReadinessLevel::ModeratelyReady
        } else if score >= 40.0 {
            ReadinessLevel::NeedsDevelopment
        } else {
            ReadinessLevel::SignificantDevelopmentNeeded
        }
    }
}

impl fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ReadinessLevel::HighlyReady => "Highly Ready",
            ReadinessLevel::ModeratelyReady => "Moderately Ready",
            ReadinessLevel::NeedsDevelopment => "Needs Development",
            ReadinessLevel::SignificantDevelopmentNeeded => "Significant Development Needed",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readiness {
    pub score: f64,
    pub level: ReadinessLevel,
    pub improvement_potential: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapReport {
    pub position_id: String,
    pub position_title: String,
    pub missing_required: Vec<SkillId>,
    pub missing_advanced: Vec<SkillId>,
    pub missing_tools: Vec<SkillId>,
    pub present_required: Vec<SkillId>,
    pub present_advanced: Vec<SkillId>,
    pub present_tools: Vec<SkillId>,
    pub completion: TierCompletion,
    pub readiness: Readiness,
    pub career_level: String,
}

impl SkillGapReport {
    pub fn missing(&self, tier: SkillTier) -> &[SkillId] {
        match tier {
            SkillTier::Required => &self.missing_required,
            SkillTier::Advanced => &self.missing_advanced,
            SkillTier::Tools => &self.missing_tools,
        }
    }

    pub fn has_gaps(&self) -> bool {
        !(self.missing_required.is_empty() && self.missing_advanced.is_empty() && self.missing_tools.is_empty())
    }
}

pub struct SkillGapAnalyzer {
    taxonomy: Arc<SkillTaxonomy>,
}

impl SkillGapAnalyzer {
    pub fn new(taxonomy: Arc<SkillTaxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn analyze(&self, profile: &CandidateProfile, requirement: &PositionRequirement) -> SkillGapReport {
        let (missing_required, present_required) = self.split(&requirement.required_skills, &profile.skills);
        let (missing_advanced, present_advanced) = self.split(&requirement.advanced_skills, &profile.skills);
        let (missing_tools, present_tools) = self.split(&requirement.tool_skills, &profile.skills);

        let completion = TierCompletion {
            required: completion(present_required.len(), requirement.required_skills.len()),
            advanced: completion(present_advanced.len(), requirement.advanced_skills.len()),
            tools: completion(present_tools.len(), requirement.tool_skills.len()),
        };

        let score = completion.required * REQUIRED_WEIGHT
            + completion.advanced * ADVANCED_WEIGHT
            + completion.tools * TOOLS_WEIGHT;
        let readiness = Readiness {
            score,
            level: ReadinessLevel::from_score(score),
            improvement_potential: 100.0 - score,
        };

        SkillGapReport {
            position_id: requirement.id.clone(),
            position_title: requirement.title.clone(),
            missing_required,
            missing_advanced,
            missing_tools,
            present_required,
            present_advanced,
            present_tools,
            completion,
            readiness,
            career_level: career_level(profile, requirement),
        }
    }

    /// (missing, present), each in taxonomy order
    fn split(&self, tier: &BTreeSet<SkillId>, skills: &BTreeSet<SkillId>) -> (Vec<SkillId>, Vec<SkillId>) {
        let (present, missing): (Vec<SkillId>, Vec<SkillId>) = tier.iter().cloned().partition(|s| skills.contains(s));
        (self.taxonomy.sort_by_rank(missing), self.taxonomy.sort_by_rank(present))
    }
}

/// Percentage of a tier the candidate covers; an empty tier is complete.
fn completion(present: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        100.0 * present as f64 / total as f64
    }
}

/// The most senior stage whose skills the candidate mostly has.
fn career_level(profile: &CandidateProfile, requirement: &PositionRequirement) -> String {
    requirement
        .career_progression
        .iter()
        .rev()
        .find(|stage| {
            !stage.skills.is_empty() && {
                let present = stage.skills.iter().filter(|s| profile.has_skill(s)).count();
                completion(present, stage.skills.len()) >= STAGE_MATCH_THRESHOLD
            }
        })
        .map(|stage| stage.level.clone())
        .unwrap_or_else(|| BEGINNER_LEVEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;

    fn profile(skills: &[&str]) -> CandidateProfile {
        CandidateProfile {
            skills: skills.iter().map(|s| SkillId::new(*s)).collect(),
            ..CandidateProfile::default()
        }
    }

    #[test]
    fn test_gap_per_tier() {
        let catalogs = Catalogs::builtin().unwrap();
        let analyzer = SkillGapAnalyzer::new(catalogs.taxonomy.clone());
        let requirement = catalogs.positions.get("devops").unwrap();

        let report = analyzer.analyze(&profile(&["linux", "docker", "kubernetes", "jenkins"]), requirement);

        assert_eq!(report.missing_required, vec![SkillId::new("cloud")]);
        assert_eq!(report.missing_advanced.len(), 3);
        assert!((report.completion.required - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.completion.advanced, 25.0);
        assert_eq!(report.completion.tools, 25.0);
        assert_eq!(report.present_tools, vec![SkillId::new("jenkins")]);
    }

    #[test]
    fn test_missing_skills_follow_taxonomy_order() {
        let catalogs = Catalogs::builtin().unwrap();
        let analyzer = SkillGapAnalyzer::new(catalogs.taxonomy.clone());
        let requirement = catalogs.positions.get("data_science").unwrap();

        let report = analyzer.analyze(&profile(&[]), requirement);
        assert_eq!(
            report.missing_required,
            vec![SkillId::new("python"), SkillId::new("sql"), SkillId::new("statistics")]
        );
        assert_eq!(report.readiness.score, 0.0);
        assert_eq!(report.readiness.level, ReadinessLevel::SignificantDevelopmentNeeded);
        assert_eq!(report.career_level, BEGINNER_LEVEL);
    }

    #[test]
    fn test_empty_tier_counts_as_complete() {
        let catalogs = Catalogs::builtin().unwrap();
        let analyzer = SkillGapAnalyzer::new(catalogs.taxonomy.clone());
        let mut requirement = catalogs.positions.get("devops").unwrap().clone();
        requirement.tool_skills.clear();

        let report = analyzer.analyze(&profile(&["linux", "docker", "cloud"]), &requirement);
        assert_eq!(report.completion.tools, 100.0);
        assert_eq!(report.completion.required, 100.0);
        assert_eq!(report.readiness.score, 70.0);
        assert_eq!(report.readiness.level, ReadinessLevel::ModeratelyReady);
        assert_eq!(report.readiness.improvement_potential, 30.0);
    }

    #[test]
    fn test_career_level_is_highest_qualifying_stage() {
        let catalogs = Catalogs::builtin().unwrap();
        let analyzer = SkillGapAnalyzer::new(catalogs.taxonomy.clone());
        let requirement = catalogs.positions.get("web_development").unwrap();

        let junior = analyzer.analyze(&profile(&["html", "css", "javascript"]), requirement);
        assert_eq!(junior.career_level, "junior");

        // 6 of the 8 senior skills clear the threshold even though "lead" does not
        let senior = analyzer.analyze(
            &profile(&["html", "css", "javascript", "git", "react", "nodejs", "typescript"]),
            requirement,
        );
        assert_eq!(senior.career_level, "senior");
    }

    #[test]
    fn test_readiness_levels() {
        assert_eq!(ReadinessLevel::from_score(80.0), ReadinessLevel::HighlyReady);
        assert_eq!(ReadinessLevel::from_score(79.9), ReadinessLevel::ModeratelyReady);
        assert_eq!(ReadinessLevel::from_score(40.0), ReadinessLevel::NeedsDevelopment);
        assert_eq!(ReadinessLevel::from_score(39.9), ReadinessLevel::SignificantDevelopmentNeeded);
    }
}
