//! Input processing module
//! Handles file detection and text extraction for résumé files

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::{extract_text, source_name, InputManager};
