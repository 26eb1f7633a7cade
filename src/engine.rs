//! The advisor facade: extraction, prediction, gap analysis and planning over
//! one catalog snapshot per call.

use crate::catalog::{CatalogStore, Catalogs};
use crate::config::{CatalogConfig, Config, PlannerConfig};
use crate::error::Result;
use crate::planning::{ImprovementPlan, RecommendationPlanner, SkillGapAnalyzer, SkillGapReport};
use crate::processing::DocumentExtractor;
use crate::profile::{CandidateProfile, ExtractedProfile};
use crate::scoring::{ConfidenceBands, LogisticModel, PredictionResult, SuitabilityModel, SuitabilityScorer};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Everything produced for one candidate against one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvaluation {
    pub source_file_name: String,
    pub extracted: ExtractedProfile,
    pub prediction: PredictionResult,
    pub gap: SkillGapReport,
    pub plan: ImprovementPlan,
}

pub struct Advisor {
    catalogs: CatalogStore,
    model: Option<Arc<dyn SuitabilityModel>>,
    extractor: DocumentExtractor,
    bands: ConfidenceBands,
    planner: PlannerConfig,
}

impl Advisor {
    pub fn new(catalogs: Catalogs, model: Option<Arc<dyn SuitabilityModel>>, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalogs: CatalogStore::new(catalogs),
            model,
            extractor: DocumentExtractor::new(config.extraction.clone()),
            bands: ConfidenceBands::from_config(&config.scoring)?,
            planner: config.planner.clone(),
        })
    }

    /// Catalogs and model as named in the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalogs = Catalogs::from_config(&config.catalog)?;
        let model: Option<Arc<dyn SuitabilityModel>> = match &config.catalog.model_path {
            Some(path) => Some(Arc::new(LogisticModel::load(path, config.scoring.decision_threshold)?)),
            None => {
                info!("No model configured; predictions use the rule verdict only");
                None
            }
        };
        Self::new(catalogs, model, config)
    }

    /// Built-in catalogs, default configuration and no model.
    pub fn builtin() -> Result<Self> {
        Self::new(Catalogs::builtin()?, None, &Config::default())
    }

    pub fn with_model(mut self, model: Arc<dyn SuitabilityModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn catalogs(&self) -> Arc<Catalogs> {
        self.catalogs.snapshot()
    }

    pub fn reload_catalogs(&self, config: &CatalogConfig) -> Result<()> {
        self.catalogs.reload(config)
    }

    pub fn extract(&self, text: &str, source_file_name: &str) -> ExtractedProfile {
        let catalogs = self.catalogs.snapshot();
        self.extractor.extract(&catalogs.taxonomy, text, source_file_name)
    }

    pub fn predict(&self, profile: &CandidateProfile, position_id: &str) -> Result<PredictionResult> {
        let catalogs = self.catalogs.snapshot();
        self.predict_with(&catalogs, profile, position_id)
    }

    pub fn analyze_gap(&self, profile: &CandidateProfile, position_id: &str) -> Result<SkillGapReport> {
        let catalogs = self.catalogs.snapshot();
        self.analyze_gap_with(&catalogs, profile, position_id)
    }

    pub fn build_plan(&self, report: &SkillGapReport) -> ImprovementPlan {
        let catalogs = self.catalogs.snapshot();
        self.build_plan_with(&catalogs, report)
    }

    /// Position ids in catalog order.
    pub fn list_positions(&self) -> Vec<String> {
        self.catalogs.snapshot().positions.ids()
    }

    /// Extract, predict, analyze and plan against a single catalog snapshot.
    pub fn evaluate(&self, text: &str, source_file_name: &str, position_id: &str) -> Result<CandidateEvaluation> {
        let catalogs = self.catalogs.snapshot();
        // Resolve the position first so an unknown id fails before extraction
        catalogs.positions.get(position_id)?;

        let extracted = self.extractor.extract(&catalogs.taxonomy, text, source_file_name);
        let prediction = self.predict_with(&catalogs, &extracted.profile, position_id)?;
        let gap = self.analyze_gap_with(&catalogs, &extracted.profile, position_id)?;
        let plan = self.build_plan_with(&catalogs, &gap);

        Ok(CandidateEvaluation {
            source_file_name: source_file_name.to_string(),
            extracted,
            prediction,
            gap,
            plan,
        })
    }

    fn predict_with(&self, catalogs: &Catalogs, profile: &CandidateProfile, position_id: &str) -> Result<PredictionResult> {
        let requirement = catalogs.positions.get(position_id)?;
        let scorer = SuitabilityScorer::new(catalogs.taxonomy.clone(), self.model.clone(), self.bands);
        Ok(scorer.predict(profile, requirement))
    }

    fn analyze_gap_with(
        &self,
        catalogs: &Catalogs,
        profile: &CandidateProfile,
        position_id: &str,
    ) -> Result<SkillGapReport> {
        let requirement = catalogs.positions.get(position_id)?;
        Ok(SkillGapAnalyzer::new(catalogs.taxonomy.clone()).analyze(profile, requirement))
    }

    fn build_plan_with(&self, catalogs: &Catalogs, report: &SkillGapReport) -> ImprovementPlan {
        let position_certifications = catalogs
            .positions
            .get(&report.position_id)
            .map(|p| p.certifications.as_slice())
            .unwrap_or(&[]);

        RecommendationPlanner::new(&catalogs.taxonomy, &catalogs.costs, &self.planner)
            .plan(report, position_certifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::scoring::SuitabilityLabel;

    #[test]
    fn test_lists_builtin_positions() {
        let advisor = Advisor::builtin().unwrap();
        assert_eq!(advisor.list_positions().len(), 5);
        assert!(!advisor.has_model());
    }

    #[test]
    fn test_unknown_position_error() {
        let advisor = Advisor::builtin().unwrap();
        let profile = CandidateProfile::default();
        assert!(matches!(
            advisor.predict(&profile, "astronaut"),
            Err(AdvisorError::UnknownPosition { .. })
        ));
        assert!(matches!(
            advisor.evaluate("python", "", "astronaut"),
            Err(AdvisorError::UnknownPosition { .. })
        ));
    }

    #[test]
    fn test_reload_catalogs_swaps_positions() {
        use std::io::Write;

        let advisor = Advisor::builtin().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[positions]]\nid = \"qa\"\ntitle = \"QA Engineer\"\nrequired_skills = [\"python\"]").unwrap();

        let config = CatalogConfig {
            positions_path: Some(file.path().to_path_buf()),
            ..CatalogConfig::default()
        };
        advisor.reload_catalogs(&config).unwrap();

        assert_eq!(advisor.list_positions(), vec!["qa".to_string()]);
        assert!(advisor.analyze_gap(&CandidateProfile::default(), "QA Engineer").is_ok());
    }

    #[test]
    fn test_evaluate_without_model_uses_rules() {
        let advisor = Advisor::builtin().unwrap();
        let text = "Sam Lee\nSkills: Linux, Docker, AWS cloud\n4 years of experience\nBachelor of Science";
        let evaluation = advisor.evaluate(text, "sam.txt", "devops").unwrap();

        assert_eq!(evaluation.prediction.label, SuitabilityLabel::Suitable);
        assert_eq!(evaluation.prediction.confidence, 0.0);
        assert_eq!(evaluation.gap.completion.required, 100.0);
        assert!(evaluation.plan.steps.iter().all(|s| s.priority != crate::planning::Priority::High));
    }
}
