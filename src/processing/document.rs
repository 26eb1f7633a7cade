//! Résumé section detection

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
    Languages,
    Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub section_type: SectionType,
    /// Content that followed the heading on the same line (`Projects: Atlas, Orbit`)
    pub inline: Option<String>,
    pub lines: Vec<String>,
}

/// A résumé split into headed sections. Text before the first heading is kept
/// as the preamble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub preamble: Vec<String>,
    pub sections: Vec<DocumentSection>,
}

const SECTION_PATTERNS: &[(SectionType, &[&str])] = &[
    (SectionType::Summary, &["summary", "professional summary", "profile", "objective", "about", "about me", "overview"]),
    (SectionType::Skills, &["skills", "technical skills", "key skills", "core competencies", "expertise", "technologies"]),
    (
        SectionType::Experience,
        &["experience", "work experience", "professional experience", "employment", "employment history", "work history", "career"],
    ),
    (SectionType::Education, &["education", "academic background", "qualifications", "education and training"]),
    (SectionType::Projects, &["project", "projects", "personal projects", "key projects", "notable projects", "portfolio"]),
    (
        SectionType::Certifications,
        &[
            "certification",
            "certifications",
            "certificates",
            "licenses",
            "licenses and certifications",
            "certifications and licenses",
            "courses and certifications",
        ],
    ),
    (SectionType::Languages, &["languages", "spoken languages"]),
    (SectionType::Contact, &["contact", "contact information", "contact details"]),
];

/// Recognise a heading line, returning its section type and any inline content.
pub fn detect_heading(line: &str) -> Option<(SectionType, Option<String>)> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (head, rest) = match trimmed.split_once(':') {
        Some((head, rest)) => (head, Some(rest.trim())),
        None => (trimmed, None),
    };

    let key = heading_key(head);
    if key.is_empty() || key.split_whitespace().count() > 4 {
        return None;
    }

    SECTION_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.contains(&key.as_str()))
        .map(|(section_type, _)| {
            let inline = rest.filter(|r| !r.is_empty()).map(|r| r.to_string());
            (*section_type, inline)
        })
}

pub fn is_heading(line: &str) -> bool {
    detect_heading(line).is_some()
}

/// Lower-cased heading text without markdown/bullet decoration.
fn heading_key(head: &str) -> String {
    let lowered = head.to_lowercase().replace('&', " and ");
    let stripped = lowered.trim_matches(|c: char| !c.is_alphanumeric());
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl ResumeDocument {
    pub fn parse(text: &str) -> Self {
        let mut preamble = Vec::new();
        let mut sections: Vec<DocumentSection> = Vec::new();

        for line in text.lines() {
            if let Some((section_type, inline)) = detect_heading(line) {
                sections.push(DocumentSection {
                    section_type,
                    inline,
                    lines: Vec::new(),
                });
                continue;
            }

            match sections.last_mut() {
                Some(section) => section.lines.push(line.to_string()),
                None => preamble.push(line.to_string()),
            }
        }

        Self { preamble, sections }
    }

    pub fn sections_of(&self, section_type: SectionType) -> impl Iterator<Item = &DocumentSection> {
        self.sections.iter().filter(move |s| s.section_type == section_type)
    }

    pub fn has_section(&self, section_type: SectionType) -> bool {
        self.sections_of(section_type).next().is_some()
    }

    /// Entries listed under every section of `section_type`, in document order.
    /// Inline heading content is split on `,` and `;`; each following line is
    /// one entry once bullets and numbering are stripped.
    pub fn list_entries(&self, section_type: SectionType, max_entries: usize) -> Vec<String> {
        let mut entries = Vec::new();

        for section in self.sections_of(section_type) {
            if let Some(inline) = &section.inline {
                entries.extend(
                    inline
                        .split([',', ';'])
                        .map(str::trim)
                        .filter(|part| part.len() >= 3)
                        .map(|part| part.to_string()),
                );
            }

            entries.extend(
                section
                    .lines
                    .iter()
                    .map(|line| strip_bullet(line))
                    .filter(|line| line.len() >= 3)
                    .map(|line| line.to_string()),
            );
        }

        entries.truncate(max_entries);
        entries
    }
}

/// Remove list markers such as `-`, `*`, `•` or `1.` from the start of a line.
pub fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim();
    let without_marker = trimmed.trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '·' | '▪' | '–' | '+' | '>'));

    let digits = without_marker.chars().take_while(|c| c.is_ascii_digit()).count();
    let numbered = if digits > 0 {
        let rest = &without_marker[digits..];
        rest.strip_prefix('.')
            .or_else(|| rest.strip_prefix(')'))
            .unwrap_or(without_marker)
    } else {
        without_marker
    };

    numbered.trim()
}
