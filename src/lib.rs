//! Candidate advisor library: résumé profiles, suitability prediction,
//! skill-gap analysis and learning plans

pub mod batch;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod planning;
pub mod processing;
pub mod profile;
pub mod scoring;
pub mod taxonomy;

pub use batch::{BatchInput, BatchRunner, BatchSummary};
pub use catalog::{CatalogStore, Catalogs};
pub use config::Config;
pub use engine::{Advisor, CandidateEvaluation};
pub use error::{AdvisorError, Result};
pub use profile::{CandidateProfile, ExtractedProfile};
pub use scoring::{PredictionResult, SuitabilityModel};
