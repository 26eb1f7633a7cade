//! Report envelope shared by every output format

use crate::batch::BatchSummary;
use crate::catalog::PositionRequirement;
use crate::engine::CandidateEvaluation;
use crate::planning::{ImprovementPlan, SkillGapReport};
use crate::profile::ExtractedProfile;
use crate::scoring::PredictionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One command's result plus the metadata stamped on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub content: ReportContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    /// Source file the report is about, when there is a single one
    pub source: Option<String>,
    /// Whether a suitability model took part in the prediction
    pub model_configured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ReportContent {
    Extraction(ExtractedProfile),
    Prediction(PredictionResult),
    Gap(SkillGapReport),
    Plan {
        gap: SkillGapReport,
        plan: ImprovementPlan,
    },
    Evaluation(Box<CandidateEvaluation>),
    Batch(BatchSummary),
    Positions(Vec<PositionRequirement>),
}

impl Report {
    pub fn new(content: ReportContent) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                source: None,
                model_configured: false,
            },
            content,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }

    pub fn with_model(mut self, configured: bool) -> Self {
        self.metadata.model_configured = configured;
        self
    }

    /// Same name as the serialized `kind` tag.
    pub fn kind(&self) -> &'static str {
        match &self.content {
            ReportContent::Extraction(_) => "extraction",
            ReportContent::Prediction(_) => "prediction",
            ReportContent::Gap(_) => "gap",
            ReportContent::Plan { .. } => "plan",
            ReportContent::Evaluation(_) => "evaluation",
            ReportContent::Batch(_) => "batch",
            ReportContent::Positions(_) => "positions",
        }
    }

    /// Heading used by the console and markdown formatters.
    pub fn title(&self) -> &'static str {
        match &self.content {
            ReportContent::Extraction(_) => "Candidate Profile",
            ReportContent::Prediction(_) => "Suitability Prediction",
            ReportContent::Gap(_) => "Skill Gap Analysis",
            ReportContent::Plan { .. } => "Improvement Plan",
            ReportContent::Evaluation(_) => "Candidate Evaluation",
            ReportContent::Batch(_) => "Batch Evaluation",
            ReportContent::Positions(_) => "Positions",
        }
    }
}
