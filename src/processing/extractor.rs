//! Résumé text → [`CandidateProfile`]
//!
//! Extraction never fails. Every sub-extraction that finds nothing leaves its
//! field at the default and records the field in
//! [`ExtractedProfile::degraded`].

use crate::config::ExtractionConfig;
use crate::processing::document::{is_heading, ResumeDocument, SectionType};
use crate::processing::text_processor::TextProcessor;
use crate::profile::{CandidateProfile, ContactInfo, EducationLevel, ExtractedProfile, ProfileField};
use crate::taxonomy::SkillTaxonomy;
use log::{debug, warn};
use std::collections::BTreeMap;

/// Words that mark a free-standing certification line when the résumé has no
/// certifications section.
const CERTIFICATION_MARKERS: [&str; 4] = ["certified", "certification", "certificate", "certificates"];

/// Holds the compiled extraction regexes. The taxonomy is passed per call so
/// one extractor serves every catalog snapshot.
pub struct DocumentExtractor {
    processor: TextProcessor,
    config: ExtractionConfig,
}

impl DocumentExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            processor: TextProcessor::new(),
            config,
        }
    }

    pub fn extract(&self, taxonomy: &SkillTaxonomy, raw_text: &str, source_file_name: &str) -> ExtractedProfile {
        let text = self.processor.clean_text(raw_text);

        if text.trim().is_empty() {
            warn!("No text to extract from {}", display_source(source_file_name));
            return ExtractedProfile {
                profile: CandidateProfile {
                    source_file_name: source_file_name.to_string(),
                    ..CandidateProfile::default()
                },
                skills_by_category: BTreeMap::new(),
                degraded: ProfileField::ALL.to_vec(),
            };
        }

        if text.chars().count() < self.config.min_text_chars {
            warn!(
                "Sparse text extracted from {} ({} characters)",
                display_source(source_file_name),
                text.chars().count()
            );
        }

        let document = ResumeDocument::parse(&text);

        let contact = ContactInfo {
            name: self.processor.extract_name(&text, is_heading),
            email: self.processor.extract_email(&text),
            phone: self.processor.extract_phone(&text),
            linkedin: self.processor.extract_linkedin(&text),
            github: self.processor.extract_github(&text),
        };

        let skills = taxonomy.find_skills(&text);
        let total_years = self.processor.extract_years(&text, self.config.max_years);
        let highest_degree = self.processor.extract_education(&text);
        let certifications = self.extract_certifications(&document, &text);
        let projects = document.list_entries(SectionType::Projects, self.config.max_list_entries);
        let languages = self.processor.extract_languages(&text);

        let mut degraded = Vec::new();
        let mut mark = |missing: bool, field: ProfileField| {
            if missing {
                degraded.push(field);
            }
        };
        mark(contact.name.is_none(), ProfileField::Name);
        mark(contact.email.is_none(), ProfileField::Email);
        mark(contact.phone.is_none(), ProfileField::Phone);
        mark(skills.is_empty(), ProfileField::Skills);
        mark(total_years.is_none(), ProfileField::Experience);
        mark(highest_degree.is_none(), ProfileField::Education);
        mark(certifications.is_empty(), ProfileField::Certifications);
        mark(projects.is_empty(), ProfileField::Projects);
        mark(languages.is_empty(), ProfileField::Languages);

        debug!(
            "Extracted {} skills, {:?} years, {:?} degree from {} (defaulted: {:?})",
            skills.len(),
            total_years,
            highest_degree,
            display_source(source_file_name),
            degraded
        );

        let skills_by_category = taxonomy.group_by_category(&skills);

        ExtractedProfile {
            profile: CandidateProfile {
                contact,
                skills,
                total_years: total_years.unwrap_or(0.0),
                highest_degree: highest_degree.unwrap_or(EducationLevel::None),
                certifications,
                projects,
                languages,
                source_file_name: source_file_name.to_string(),
            },
            skills_by_category,
            degraded,
        }
    }

    /// Certifications section entries, or lines that mention a certification
    /// when no such section exists.
    fn extract_certifications(&self, document: &ResumeDocument, text: &str) -> Vec<String> {
        if document.has_section(SectionType::Certifications) {
            return document.list_entries(SectionType::Certifications, self.config.max_list_entries);
        }

        text.lines()
            .map(crate::processing::document::strip_bullet)
            .filter(|line| {
                let lowered = line.to_lowercase();
                lowered
                    .split(|c: char| !c.is_alphanumeric())
                    .any(|word| CERTIFICATION_MARKERS.contains(&word))
            })
            .filter(|line| !is_heading(line) && line.len() > 10)
            .take(self.config.max_list_entries)
            .map(|line| line.to_string())
            .collect()
    }
}

fn display_source(source: &str) -> &str {
    if source.is_empty() {
        "<inline text>"
    } else {
        source
    }
}
