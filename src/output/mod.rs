//! Report rendering for the command line

pub mod formatter;
pub mod report;

pub use formatter::{resolve_report_path, save_report_to_file, suggest_filename, ReportGenerator};
pub use report::{Report, ReportContent, ReportMetadata};
