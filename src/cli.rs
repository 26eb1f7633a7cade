//! CLI interface for the candidate advisor

use crate::config::OutputFormat;
use crate::input::file_detector::FileType;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "candidate-advisor")]
#[command(about = "Candidate suitability scoring and skill-gap learning plans")]
#[command(long_about = "Extract a candidate profile from a resume, predict suitability for a position, \
and build a prioritized learning plan for the missing skills")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Rendering options shared by every reporting command
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Output format: console, json, markdown (defaults to the configured format)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Save output to file
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// Show full details
    #[arg(short, long)]
    pub detailed: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a candidate profile from a resume
    Extract {
        /// Path to resume file (PDF, TXT, MD)
        resume: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Predict whether a candidate suits a position
    Predict {
        /// Path to resume file (PDF, TXT, MD)
        resume: PathBuf,

        /// Position id, alias or title (e.g. "data_science", "Data Scientist")
        #[arg(short, long)]
        position: String,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Show which skills a candidate is missing for a position
    Gap {
        /// Path to resume file (PDF, TXT, MD)
        resume: PathBuf,

        /// Position id, alias or title
        #[arg(short, long)]
        position: String,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Build a learning plan for the missing skills
    Plan {
        /// Path to resume file (PDF, TXT, MD)
        resume: PathBuf,

        /// Position id, alias or title
        #[arg(short, long)]
        position: String,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Evaluate many resumes against one position
    Batch {
        /// Resume files or directories of resumes
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Position id, alias or title
        #[arg(short, long)]
        position: String,

        /// Number of resumes evaluated concurrently
        #[arg(short, long)]
        workers: Option<usize>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// List the positions in the catalog
    Positions {
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Expand directories into the resume files they contain, sorted by path.
/// Files named explicitly are kept as given so that unsupported ones are
/// reported per unit instead of silently skipped.
pub fn expand_batch_inputs(paths: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(supported_files_in(path)?);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn supported_files_in(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && FileType::from_path(&path).is_supported() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
