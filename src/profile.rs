//! Candidate profile structures produced by extraction

use crate::taxonomy::{SkillCategory, SkillId, SkillTaxonomy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Highest completed degree, ordered `None < Associate < Bachelor < Master < Doctorate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    #[default]
    None,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub fn rank(self) -> i32 {
        match self {
            EducationLevel::None => 0,
            EducationLevel::Associate => 1,
            EducationLevel::Bachelor => 2,
            EducationLevel::Master => 3,
            EducationLevel::Doctorate => 4,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "none" | "" => Some(EducationLevel::None),
            "associate" => Some(EducationLevel::Associate),
            "bachelor" => Some(EducationLevel::Bachelor),
            "master" => Some(EducationLevel::Master),
            "doctorate" | "phd" => Some(EducationLevel::Doctorate),
            _ => None,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EducationLevel::None => "none",
            EducationLevel::Associate => "associate",
            EducationLevel::Bachelor => "bachelor",
            EducationLevel::Master => "master",
            EducationLevel::Doctorate => "doctorate",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

/// Structured view of one résumé. Built once per extraction, never mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub contact: ContactInfo,
    pub skills: BTreeSet<SkillId>,
    pub total_years: f64,
    pub highest_degree: EducationLevel,
    pub certifications: Vec<String>,
    pub projects: Vec<String>,
    pub languages: Vec<String>,
    pub source_file_name: String,
}

impl CandidateProfile {
    pub fn has_skill(&self, skill: &SkillId) -> bool {
        self.skills.contains(skill)
    }

    pub fn skills_by_category(&self, taxonomy: &SkillTaxonomy) -> BTreeMap<SkillCategory, Vec<SkillId>> {
        taxonomy.group_by_category(&self.skills)
    }
}

/// Profile fields that extraction can fall back to a default for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    Email,
    Phone,
    Skills,
    Experience,
    Education,
    Certifications,
    Projects,
    Languages,
}

impl ProfileField {
    pub const ALL: [ProfileField; 9] = [
        ProfileField::Name,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::Skills,
        ProfileField::Experience,
        ProfileField::Education,
        ProfileField::Certifications,
        ProfileField::Projects,
        ProfileField::Languages,
    ];
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProfileField::Name => "name",
            ProfileField::Email => "email",
            ProfileField::Phone => "phone",
            ProfileField::Skills => "skills",
            ProfileField::Experience => "experience",
            ProfileField::Education => "education",
            ProfileField::Certifications => "certifications",
            ProfileField::Projects => "projects",
            ProfileField::Languages => "languages",
        };
        f.write_str(name)
    }
}

/// Extraction result. `degraded` lists the fields that were defaulted
/// because nothing usable was found; it is never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedProfile {
    pub profile: CandidateProfile,
    /// The profile's skills bucketed by taxonomy category
    #[serde(default)]
    pub skills_by_category: BTreeMap<SkillCategory, Vec<SkillId>>,
    pub degraded: Vec<ProfileField>,
}

impl ExtractedProfile {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    pub fn is_field_degraded(&self, field: ProfileField) -> bool {
        self.degraded.contains(&field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_education_ordering() {
        assert!(EducationLevel::None < EducationLevel::Associate);
        assert!(EducationLevel::Associate < EducationLevel::Bachelor);
        assert!(EducationLevel::Bachelor < EducationLevel::Master);
        assert!(EducationLevel::Master < EducationLevel::Doctorate);
        assert_eq!(EducationLevel::Master.rank() - EducationLevel::Bachelor.rank(), 1);
    }

    #[test]
    fn test_education_parse() {
        assert_eq!(EducationLevel::parse("Bachelor"), Some(EducationLevel::Bachelor));
        assert_eq!(EducationLevel::parse("phd"), Some(EducationLevel::Doctorate));
        assert_eq!(EducationLevel::parse("kindergarten"), None);
    }
}
