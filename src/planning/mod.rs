//! Skill gap analysis and learning plans

pub mod gap;
pub mod planner;

pub use gap::{Readiness, ReadinessLevel, SkillGapAnalyzer, SkillGapReport, SkillTier, TierCompletion};
pub use planner::{CostEstimate, ImprovementPlan, PlanPhase, PlanStep, Priority, RecommendationPlanner};
