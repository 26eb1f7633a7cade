//! Turns a skill gap into an ordered, costed learning plan

use crate::catalog::SkillCostTable;
use crate::config::PlannerConfig;
use crate::planning::gap::{SkillGapReport, SkillTier};
use crate::taxonomy::{SkillId, SkillTaxonomy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn for_tier(tier: SkillTier) -> Self {
        match tier {
            SkillTier::Required => Priority::High,
            SkillTier::Advanced => Priority::Medium,
            SkillTier::Tools => Priority::Low,
        }
    }

    fn phase(self) -> (&'static str, &'static str) {
        match self {
            Priority::High => ("0-3 months", "Critical Skill Development"),
            Priority::Medium => ("3-6 months", "Advanced Skill Building"),
            Priority::Low => ("6-12 months", "Mastery and Specialization"),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => f.write_str("High"),
            Priority::Medium => f.write_str("Medium"),
            Priority::Low => f.write_str("Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub skill: SkillId,
    pub action: String,
    pub tier: SkillTier,
    pub priority: Priority,
    pub estimated_weeks: u32,
    pub course_cost: f64,
    pub certification_cost: f64,
    pub certification: Option<String>,
    pub courses: Vec<String>,
}

impl PlanStep {
    pub fn total_cost(&self) -> f64 {
        self.course_cost + self.certification_cost
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostEstimate {
    pub courses: f64,
    pub certifications: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPhase {
    pub priority: Priority,
    pub duration: String,
    pub focus: String,
    pub skills: Vec<SkillId>,
    pub weeks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementPlan {
    pub position_id: String,
    /// High before Medium before Low; taxonomy order within a priority
    pub steps: Vec<PlanStep>,
    pub estimated_cost: CostEstimate,
    pub total_weeks: u32,
    pub phases: Vec<PlanPhase>,
    pub time_to_readiness: String,
    pub recommended_certifications: Vec<String>,
}

impl ImprovementPlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

pub struct RecommendationPlanner<'a> {
    taxonomy: &'a SkillTaxonomy,
    costs: &'a SkillCostTable,
    config: &'a PlannerConfig,
}

impl<'a> RecommendationPlanner<'a> {
    pub fn new(taxonomy: &'a SkillTaxonomy, costs: &'a SkillCostTable, config: &'a PlannerConfig) -> Self {
        Self {
            taxonomy,
            costs,
            config,
        }
    }

    /// One step per missing skill. A skill missing from several tiers is
    /// planned once, at its highest-priority tier.
    pub fn plan(&self, report: &SkillGapReport, position_certifications: &[String]) -> ImprovementPlan {
        let mut seen: HashSet<&SkillId> = HashSet::new();
        let mut steps = Vec::new();

        for tier in [SkillTier::Required, SkillTier::Advanced, SkillTier::Tools] {
            for skill in report.missing(tier) {
                if seen.insert(skill) {
                    steps.push(self.step(skill, tier));
                }
            }
        }

        steps.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| self.taxonomy.rank(&a.skill).cmp(&self.taxonomy.rank(&b.skill)))
                .then_with(|| a.skill.cmp(&b.skill))
        });

        let courses: f64 = steps.iter().map(|s| s.course_cost).sum();
        let certifications: f64 = steps.iter().map(|s| s.certification_cost).sum();
        let estimated_cost = CostEstimate {
            courses,
            certifications,
            total: courses + certifications,
        };

        let total_weeks = steps.iter().map(|s| s.estimated_weeks).sum();
        let readiness_weeks: u32 = steps
            .iter()
            .filter(|s| s.priority != Priority::Low)
            .map(|s| s.estimated_weeks)
            .sum();

        ImprovementPlan {
            position_id: report.position_id.clone(),
            phases: phases(&steps),
            time_to_readiness: time_to_readiness(readiness_weeks).to_string(),
            recommended_certifications: self.certifications(&steps, position_certifications),
            estimated_cost,
            total_weeks,
            steps,
        }
    }

    fn step(&self, skill: &SkillId, tier: SkillTier) -> PlanStep {
        let priority = Priority::for_tier(tier);
        let action = match tier {
            SkillTier::Required => format!("Learn {}", skill),
            SkillTier::Advanced => format!("Master {}", skill),
            SkillTier::Tools => format!("Specialize in {}", skill),
        };

        match self.costs.get(skill) {
            Some(cost) => PlanStep {
                skill: skill.clone(),
                action,
                tier,
                priority,
                estimated_weeks: cost.weeks,
                course_cost: cost.course_cost,
                certification_cost: cost.certification_cost,
                certification: cost.certification.clone(),
                courses: cost.courses.clone(),
            },
            None => PlanStep {
                skill: skill.clone(),
                action,
                tier,
                priority,
                estimated_weeks: self.config.default_weeks,
                course_cost: self.config.default_course_cost,
                certification_cost: self.config.default_certification_cost,
                certification: None,
                courses: Vec::new(),
            },
        }
    }

    /// Position certifications first, then certifications tied to High and
    /// Medium steps.
    fn certifications(&self, steps: &[PlanStep], position_certifications: &[String]) -> Vec<String> {
        let mut recommended: Vec<String> = Vec::new();
        let step_certifications = steps
            .iter()
            .filter(|s| s.priority != Priority::Low)
            .filter_map(|s| s.certification.as_ref());

        for certification in position_certifications.iter().chain(step_certifications) {
            if recommended.len() >= self.config.max_certifications {
                break;
            }
            if !recommended.iter().any(|r| r.eq_ignore_ascii_case(certification)) {
                recommended.push(certification.clone());
            }
        }

        recommended
    }
}

fn phases(steps: &[PlanStep]) -> Vec<PlanPhase> {
    [Priority::High, Priority::Medium, Priority::Low]
        .into_iter()
        .filter_map(|priority| {
            let in_phase: Vec<&PlanStep> = steps.iter().filter(|s| s.priority == priority).collect();
            if in_phase.is_empty() {
                return None;
            }
            let (duration, focus) = priority.phase();
            Some(PlanPhase {
                priority,
                duration: duration.to_string(),
                focus: focus.to_string(),
                skills: in_phase.iter().map(|s| s.skill.clone()).collect(),
                weeks: in_phase.iter().map(|s| s.estimated_weeks).sum(),
            })
        })
        .collect()
}

/// Rough calendar time to close the High and Medium gaps.
fn time_to_readiness(weeks: u32) -> &'static str {
    match weeks {
        0 => "Ready now",
        1..=8 => "2 months",
        9..=16 => "4 months",
        17..=24 => "6 months",
        25..=36 => "9 months",
        _ => "12+ months",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;
    use crate::planning::gap::SkillGapAnalyzer;
    use crate::profile::CandidateProfile;

    fn profile(skills: &[&str]) -> CandidateProfile {
        CandidateProfile {
            skills: skills.iter().map(|s| SkillId::new(*s)).collect(),
            ..CandidateProfile::default()
        }
    }

    fn plan_for(skills: &[&str], position: &str) -> ImprovementPlan {
        let catalogs = Catalogs::builtin().unwrap();
        let requirement = catalogs.positions.get(position).unwrap();
        let report = SkillGapAnalyzer::new(catalogs.taxonomy.clone()).analyze(&profile(skills), requirement);
        let config = PlannerConfig::default();
        RecommendationPlanner::new(&catalogs.taxonomy, &catalogs.costs, &config).plan(&report, &requirement.certifications)
    }

    #[test]
    fn test_steps_ordered_by_priority_then_taxonomy() {
        let plan = plan_for(&["python"], "data_science");

        let priorities: Vec<Priority> = plan.steps.iter().map(|s| s.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);

        assert_eq!(plan.steps[0].skill, SkillId::new("sql"));
        assert_eq!(plan.steps[1].skill, SkillId::new("statistics"));
        assert_eq!(plan.steps[0].action, "Learn sql");
        assert_eq!(plan.steps[2].priority, Priority::Medium);
    }

    #[test]
    fn test_overlapping_tiers_planned_once() {
        let plan = plan_for(&["design", "ui/ux"], "ui_ux_design");

        let figma: Vec<&PlanStep> = plan.steps.iter().filter(|s| s.skill.as_str() == "figma").collect();
        assert_eq!(figma.len(), 1);
        assert_eq!(figma[0].priority, Priority::Medium);
        assert_eq!(plan.steps.len(), 6);
    }

    #[test]
    fn test_cost_totals_are_sums_of_steps() {
        let plan = plan_for(&[], "devops");

        let courses: f64 = plan.steps.iter().map(|s| s.course_cost).sum();
        let certifications: f64 = plan.steps.iter().map(|s| s.certification_cost).sum();
        assert_eq!(plan.estimated_cost.courses, courses);
        assert_eq!(plan.estimated_cost.certifications, certifications);
        assert_eq!(plan.estimated_cost.total, courses + certifications);
        assert_eq!(plan.total_weeks, plan.steps.iter().map(|s| s.estimated_weeks).sum::<u32>());
    }

    #[test]
    fn test_unknown_skills_use_planner_defaults() {
        let plan = plan_for(&["mobile development", "programming"], "mobile_development");
        let kotlin = plan.steps.iter().find(|s| s.skill.as_str() == "kotlin").unwrap();
        assert_eq!(kotlin.estimated_weeks, 4);
        assert_eq!(kotlin.course_cost, 50.0);
        assert!(kotlin.courses.is_empty());
    }

    #[test]
    fn test_phases_and_readiness_time() {
        let plan = plan_for(&["linux", "cloud"], "devops");

        assert_eq!(plan.phases[0].duration, "0-3 months");
        assert_eq!(plan.phases[0].skills, vec![SkillId::new("docker")]);
        assert_eq!(plan.phases.len(), 3);
        // docker 4 + kubernetes 12 + terraform 6, ansible and ci/cd at the 4 week default
        assert_eq!(plan.time_to_readiness, "9 months");
    }

    #[test]
    fn test_certifications_deduplicated_and_capped() {
        let plan = plan_for(&[], "devops");
        assert_eq!(plan.recommended_certifications.len(), 3);
        assert_eq!(plan.recommended_certifications[0], "AWS Certified DevOps Engineer");
        assert!(plan.recommended_certifications.len() <= PlannerConfig::default().max_certifications);

        let no_gap = plan_for(
            &["linux", "docker", "cloud", "kubernetes", "terraform", "ansible", "ci/cd", "jenkins", "gitlab", "monitoring", "security"],
            "devops",
        );
        assert!(no_gap.is_empty());
        assert_eq!(no_gap.time_to_readiness, "Ready now");
        assert_eq!(no_gap.estimated_cost.total, 0.0);
    }

    #[test]
    fn test_time_buckets() {
        assert_eq!(time_to_readiness(8), "2 months");
        assert_eq!(time_to_readiness(9), "4 months");
        assert_eq!(time_to_readiness(36), "9 months");
        assert_eq!(time_to_readiness(37), "12+ months");
    }
}
