//! Configuration management for the candidate advisor

use crate::error::{AdvisorError, Result};
use crate::taxonomy::SkillDefinition;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub scoring: ScoringConfig,
    pub planner: PlannerConfig,
    pub batch: BatchConfig,
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Upper bound for a plausible "N years" mention
    pub max_years: f64,
    /// Cap on captured certification/project lines
    pub max_list_entries: usize,
    /// Texts shorter than this are logged as sparse
    pub min_text_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub high_confidence: f64,
    pub medium_confidence: f64,
    /// Probability above which the logistic model predicts `Suitable`
    pub decision_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub default_weeks: u32,
    pub default_course_cost: f64,
    pub default_certification_cost: f64,
    pub max_certifications: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub workers: usize,
    pub unit_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// TOML file with `[[positions]]`; built-in catalog when unset
    pub positions_path: Option<PathBuf>,
    /// TOML file with `[[skills]]` costs; built-in table when unset
    pub skill_costs_path: Option<PathBuf>,
    /// TOML file with logistic model weights; predictions fall back to rules when unset
    pub model_path: Option<PathBuf>,
    pub extra_skills: Vec<SkillDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_years: 50.0,
            max_list_entries: 20,
            min_text_chars: 50,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_confidence: 0.8,
            medium_confidence: 0.6,
            decision_threshold: 0.5,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_weeks: 4,
            default_course_cost: 50.0,
            default_certification_cost: 0.0,
            max_certifications: 5,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            unit_timeout_secs: Some(30),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            scoring: ScoringConfig::default(),
            planner: PlannerConfig::default(),
            batch: BatchConfig::default(),
            catalog: CatalogConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Bands must be monotonic: `0 <= medium <= high <= 1`.
    pub fn validate(&self) -> Result<()> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.high_confidence) || !in_unit(self.medium_confidence) || !in_unit(self.decision_threshold) {
            return Err(AdvisorError::Configuration(
                "scoring thresholds must lie in [0, 1]".to_string(),
            ));
        }
        if self.medium_confidence > self.high_confidence {
            return Err(AdvisorError::Configuration(format!(
                "scoring.medium_confidence ({}) exceeds scoring.high_confidence ({})",
                self.medium_confidence, self.high_confidence
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load from the user config directory, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AdvisorError::Configuration(format!("Failed to read config {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| AdvisorError::Configuration(format!("Failed to parse config {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AdvisorError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        if self.batch.workers == 0 {
            return Err(AdvisorError::Configuration("batch.workers must be at least 1".to_string()));
        }
        if self.planner.default_weeks == 0 {
            return Err(AdvisorError::Configuration("planner.default_weeks must be at least 1".to_string()));
        }
        if self.planner.default_course_cost < 0.0 || self.planner.default_certification_cost < 0.0 {
            return Err(AdvisorError::Configuration("planner default costs must not be negative".to_string()));
        }
        if !(self.extraction.max_years > 0.0) {
            return Err(AdvisorError::Configuration("extraction.max_years must be positive".to_string()));
        }
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("candidate-advisor")
            .join("config.toml")
    }
}
