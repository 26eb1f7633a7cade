//! Error handling for the candidate advisor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown position: {position}{}", suggestion_hint(.suggestion))]
    UnknownPosition {
        position: String,
        suggestion: Option<String>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Batch unit failed: {0}")]
    BatchUnit(String),
}

impl AdvisorError {
    /// Stable kind name, used when failures are aggregated in batch summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            AdvisorError::Io(_) => "io",
            AdvisorError::PdfExtraction(_) => "pdf_extraction",
            AdvisorError::UnsupportedFormat(_) => "unsupported_format",
            AdvisorError::InvalidInput(_) => "invalid_input",
            AdvisorError::UnknownPosition { .. } => "unknown_position",
            AdvisorError::Configuration(_) => "configuration",
            AdvisorError::ModelUnavailable(_) => "model_unavailable",
            AdvisorError::Serialization(_) => "serialization",
            AdvisorError::BatchUnit(_) => "batch_unit",
        }
    }
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{}'?)", s))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for AdvisorError {
    fn from(err: anyhow::Error) -> Self {
        AdvisorError::InvalidInput(err.to_string())
    }
}

impl From<toml::de::Error> for AdvisorError {
    fn from(err: toml::de::Error) -> Self {
        AdvisorError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_position_message_includes_suggestion() {
        let err = AdvisorError::UnknownPosition {
            position: "devop".to_string(),
            suggestion: Some("devops".to_string()),
        };
        assert_eq!(err.to_string(), "Unknown position: devop (did you mean 'devops'?)");
        assert_eq!(err.kind(), "unknown_position");

        let bare = AdvisorError::UnknownPosition {
            position: "astronaut".to_string(),
            suggestion: None,
        };
        assert_eq!(bare.to_string(), "Unknown position: astronaut");
    }
}
