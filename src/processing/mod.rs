//! Résumé text processing and profile extraction

pub mod document;
pub mod extractor;
pub mod text_processor;

pub use extractor::DocumentExtractor;
