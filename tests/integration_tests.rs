//! Integration tests for the candidate advisor

use candidate_advisor::batch::{BatchInput, BatchRunner};
use candidate_advisor::catalog::Catalogs;
use candidate_advisor::config::{BatchConfig, CatalogConfig, Config};
use candidate_advisor::engine::Advisor;
use candidate_advisor::error::{AdvisorError, Result};
use candidate_advisor::input::InputManager;
use candidate_advisor::planning::Priority;
use candidate_advisor::profile::{CandidateProfile, EducationLevel, ProfileField};
use candidate_advisor::scoring::{
    FeatureVector, ModelOutput, ModelStatus, RuleVerdict, SuitabilityLabel, SuitabilityModel,
};
use candidate_advisor::taxonomy::SkillId;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Always answers "suitable" with near certainty.
struct AlwaysSuitable;

impl SuitabilityModel for AlwaysSuitable {
    fn name(&self) -> &str {
        "always-suitable"
    }

    fn score(&self, _features: &FeatureVector) -> Result<ModelOutput> {
        Ok(ModelOutput {
            label: SuitabilityLabel::Suitable,
            confidence: 0.99,
        })
    }
}

struct Offline;

impl SuitabilityModel for Offline {
    fn name(&self) -> &str {
        "offline"
    }

    fn score(&self, _features: &FeatureVector) -> Result<ModelOutput> {
        Err(AdvisorError::ModelUnavailable("connection refused".to_string()))
    }
}

fn test_advisor(model: Option<Arc<dyn SuitabilityModel>>) -> Advisor {
    let catalog = CatalogConfig {
        positions_path: Some(fixture("positions.toml")),
        ..CatalogConfig::default()
    };
    let catalogs = Catalogs::from_config(&catalog).unwrap();
    Advisor::new(catalogs, model, &Config::default()).unwrap()
}

fn profile(skills: &[&str], years: f64, degree: EducationLevel) -> CandidateProfile {
    CandidateProfile {
        skills: skills.iter().map(|s| SkillId::new(*s)).collect(),
        total_years: years,
        highest_degree: degree,
        ..CandidateProfile::default()
    }
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let text = manager.extract_text(&fixture("sample_resume.txt")).await.unwrap();

    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let text = manager.extract_text(&fixture("sample_resume.md")).await.unwrap();

    assert!(text.contains("John Doe"));
    assert!(text.contains("Node.js"));
    // Markdown syntax is stripped
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = fixture("sample_resume.txt");

    let first = manager.extract_text(&path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.extract_text(&path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);

    let mut uncached = InputManager::new().with_cache(false);
    uncached.extract_text(&path).await.unwrap();
    assert_eq!(uncached.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(&fixture("unsupported.xyz")).await;
    assert!(matches!(result, Err(AdvisorError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(&fixture("nonexistent.txt")).await;
    assert!(matches!(result, Err(AdvisorError::InvalidInput(_))));
}

#[tokio::test]
async fn test_text_and_markdown_resumes_give_same_profile() {
    let advisor = Advisor::builtin().unwrap();
    let mut manager = InputManager::new();

    let txt = manager.extract_text(&fixture("sample_resume.txt")).await.unwrap();
    let md = manager.extract_text(&fixture("sample_resume.md")).await.unwrap();

    let from_txt = advisor.extract(&txt, "sample_resume.txt").profile;
    let from_md = advisor.extract(&md, "sample_resume.md").profile;

    assert_eq!(from_txt.skills, from_md.skills);
    assert_eq!(from_txt.total_years, 5.0);
    assert_eq!(from_md.total_years, 5.0);
    assert_eq!(from_txt.highest_degree, EducationLevel::Bachelor);
    assert_eq!(from_md.highest_degree, EducationLevel::Bachelor);
    assert_eq!(from_txt.contact.email.as_deref(), Some("john.doe@example.com"));
}

#[tokio::test]
async fn test_end_to_end_web_candidate() {
    let advisor = Advisor::builtin().unwrap();
    let text = InputManager::new().extract_text(&fixture("sample_resume.txt")).await.unwrap();

    let evaluation = advisor.evaluate(&text, "sample_resume.txt", "Web Developer").unwrap();

    assert_eq!(evaluation.prediction.position_id, "web_development");
    assert_eq!(evaluation.prediction.label, SuitabilityLabel::Suitable);
    assert_eq!(evaluation.prediction.rule_verdict, RuleVerdict::Pass);
    assert!(matches!(evaluation.prediction.model_status, ModelStatus::Unavailable(_)));
    assert_eq!(evaluation.prediction.confidence, 0.0);

    assert_eq!(evaluation.gap.completion.required, 100.0);
    assert!(evaluation.gap.missing_required.is_empty());
    assert!(evaluation.gap.missing_advanced.contains(&SkillId::new("typescript")));
    assert_eq!(evaluation.gap.career_level, "mid");

    assert!(evaluation.plan.steps.iter().all(|s| s.priority != Priority::High));
}

#[test]
fn test_rule_gate_overrides_confident_model() {
    let advisor = test_advisor(Some(Arc::new(AlwaysSuitable)));
    let candidate = profile(&["python", "sql"], 2.0, EducationLevel::Bachelor);

    let prediction = advisor.predict(&candidate, "backend_analyst").unwrap();

    assert_eq!(prediction.label, SuitabilityLabel::NotSuitable);
    assert_eq!(prediction.rule_verdict, RuleVerdict::Fail);
    assert_eq!(prediction.model_status, ModelStatus::Available);
    assert_eq!(prediction.rule_failures.len(), 2);
    assert!(prediction.recommendation_text.contains("docker"));
}

#[test]
fn test_missing_docker_scenario_gap_and_plan() {
    let advisor = test_advisor(Some(Arc::new(AlwaysSuitable)));
    let candidate = profile(&["python", "sql"], 2.0, EducationLevel::Bachelor);

    let gap = advisor.analyze_gap(&candidate, "backend_analyst").unwrap();
    assert_eq!(gap.missing_required, vec![SkillId::new("docker")]);
    // No tool skills listed for this position
    assert_eq!(gap.completion.tools, 100.0);
    assert!(gap.missing_tools.is_empty());

    let plan = advisor.build_plan(&gap);
    assert_eq!(plan.steps[0].priority, Priority::High);
    assert_eq!(plan.steps[0].skill, SkillId::new("docker"));
    assert!(plan.steps[0].action.contains("docker"));
    assert_eq!(plan.recommended_certifications[0], "Docker Certified Associate");
}

#[test]
fn test_qualified_candidate_follows_model() {
    let advisor = test_advisor(Some(Arc::new(AlwaysSuitable)));
    let candidate = profile(&["python", "sql", "docker"], 3.0, EducationLevel::Bachelor);

    let prediction = advisor.predict(&candidate, "data_backend").unwrap();

    assert_eq!(prediction.position_id, "backend_analyst");
    assert_eq!(prediction.label, SuitabilityLabel::Suitable);
    assert_eq!(prediction.confidence, 0.99);
    assert!(prediction.rule_failures.is_empty());
}

#[test]
fn test_unavailable_model_falls_back_to_rules() {
    let advisor = test_advisor(Some(Arc::new(Offline)));
    let candidate = profile(&["python", "sql", "docker"], 4.0, EducationLevel::Master);

    let prediction = advisor.predict(&candidate, "backend_analyst").unwrap();

    assert_eq!(prediction.label, SuitabilityLabel::Suitable);
    assert_eq!(prediction.confidence, 0.0);
    assert!(matches!(prediction.model_status, ModelStatus::Unavailable(ref reason) if reason.contains("connection refused")));
}

#[test]
fn test_empty_text_is_not_an_error() {
    let advisor = Advisor::builtin().unwrap();
    let extracted = advisor.extract("", "empty.txt");

    assert!(extracted.profile.skills.is_empty());
    assert_eq!(extracted.profile.total_years, 0.0);
    assert_eq!(extracted.profile.highest_degree, EducationLevel::None);
    assert!(extracted.is_field_degraded(ProfileField::Skills));
    assert_eq!(extracted.degraded.len(), ProfileField::ALL.len());

    let evaluation = advisor.evaluate("", "empty.txt", "devops").unwrap();
    assert_eq!(evaluation.prediction.label, SuitabilityLabel::NotSuitable);
    assert_eq!(evaluation.gap.completion.required, 0.0);
}

#[test]
fn test_evaluation_is_deterministic() {
    let advisor = Advisor::builtin().unwrap();
    let text = std::fs::read_to_string(fixture("sample_resume.txt")).unwrap();

    let first = advisor.evaluate(&text, "a.txt", "web_development").unwrap();
    let second = advisor.evaluate(&text, "a.txt", "web_development").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_plan_cost_is_sum_of_steps() {
    let advisor = Advisor::builtin().unwrap();
    let candidate = profile(&["design"], 1.0, EducationLevel::None);

    let gap = advisor.analyze_gap(&candidate, "ui_ux_design").unwrap();
    let plan = advisor.build_plan(&gap);

    let step_total: f64 = plan.steps.iter().map(|s| s.total_cost()).sum();
    assert!((plan.estimated_cost.total - step_total).abs() < 1e-9);
    assert!(
        (plan.estimated_cost.total - plan.estimated_cost.courses - plan.estimated_cost.certifications).abs() < 1e-9
    );

    // Figma and sketch are both advanced and tool skills but are planned once
    let figma_steps = plan.steps.iter().filter(|s| s.skill.as_str() == "figma").count();
    assert_eq!(figma_steps, 1);

    let priorities: Vec<Priority> = plan.steps.iter().map(|s| s.priority).collect();
    let mut sorted = priorities.clone();
    sorted.sort();
    assert_eq!(priorities, sorted);
}

#[test]
fn test_unknown_position_suggests_closest() {
    let advisor = Advisor::builtin().unwrap();
    match advisor.predict(&CandidateProfile::default(), "devopz") {
        Err(AdvisorError::UnknownPosition { suggestion, .. }) => {
            assert_eq!(suggestion.as_deref(), Some("devops"));
        }
        other => panic!("expected unknown position, got {:?}", other),
    }
}

#[test]
fn test_invalid_catalog_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.toml");
    std::fs::write(&path, "[[positions]]\nid = \"x\"\nrequired_skills = [\"telepathy\"]\n").unwrap();

    let config = CatalogConfig {
        positions_path: Some(path),
        ..CatalogConfig::default()
    };
    assert!(matches!(Catalogs::from_config(&config), Err(AdvisorError::Configuration(_))));
}

#[tokio::test]
async fn test_batch_keeps_going_after_failures() {
    let advisor = Arc::new(Advisor::builtin().unwrap());
    let runner = BatchRunner::new(
        advisor,
        &BatchConfig {
            workers: 2,
            unit_timeout_secs: Some(30),
        },
    );

    let inputs = vec![
        BatchInput::File(fixture("sample_resume.txt")),
        BatchInput::File(fixture("unsupported.xyz")),
        BatchInput::File(fixture("sample_resume.md")),
        BatchInput::File(fixture("nonexistent.pdf")),
    ];

    let summary = runner.run(inputs, "web_development").await.unwrap();

    assert_eq!(summary.total, 4);
    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.suitable, 2);
    assert_eq!(summary.evaluations[0].source_file_name, "sample_resume.txt");
    assert_eq!(summary.evaluations[1].source_file_name, "sample_resume.md");
    assert_eq!(summary.failures_by_kind.get("unsupported_format"), Some(&1));
    assert_eq!(summary.failures_by_kind.get("invalid_input"), Some(&1));
}

#[test]
fn test_config_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.batch.workers = 8;
    config.catalog.positions_path = Some(fixture("positions.toml"));
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.batch.workers, 8);

    let advisor = Advisor::from_config(&loaded).unwrap();
    assert_eq!(advisor.list_positions(), vec!["backend_analyst".to_string()]);
}
