//! Per-skill learning time and cost estimates

use crate::error::{AdvisorError, Result};
use crate::taxonomy::{SkillId, SkillTaxonomy};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_COSTS: &str = include_str!("default_skill_costs.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCost {
    pub weeks: u32,
    pub course_cost: f64,
    pub certification_cost: f64,
    pub certification: Option<String>,
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillCostEntry {
    pub skill: String,
    pub weeks: u32,
    #[serde(default)]
    pub course_cost: f64,
    #[serde(default)]
    pub certification_cost: f64,
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default)]
    pub courses: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CostFile {
    #[serde(default)]
    skills: Vec<SkillCostEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct SkillCostTable {
    costs: HashMap<SkillId, SkillCost>,
}

impl SkillCostTable {
    pub fn builtin(taxonomy: &SkillTaxonomy) -> Result<Self> {
        Self::from_toml_str(BUILTIN_COSTS, taxonomy)
            .map_err(|e| AdvisorError::Configuration(format!("built-in skill cost table: {}", e)))
    }

    pub fn load(path: &Path, taxonomy: &SkillTaxonomy) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AdvisorError::Configuration(format!("{}: {}", path.display(), e)))?;
        let table = Self::from_toml_str(&content, taxonomy)
            .map_err(|e| AdvisorError::Configuration(format!("{}: {}", path.display(), e)))?;
        info!("Loaded costs for {} skills from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_toml_str(content: &str, taxonomy: &SkillTaxonomy) -> Result<Self> {
        let file: CostFile = toml::from_str(content)?;
        Self::from_entries(file.skills, taxonomy)
    }

    pub fn from_entries(entries: Vec<SkillCostEntry>, taxonomy: &SkillTaxonomy) -> Result<Self> {
        let mut costs = HashMap::with_capacity(entries.len());

        for entry in entries {
            let skill = taxonomy.canonicalize(&entry.skill).ok_or_else(|| {
                AdvisorError::Configuration(format!("unknown skill '{}' in cost table", entry.skill))
            })?;

            if entry.weeks == 0 {
                return Err(AdvisorError::Configuration(format!("skill '{}': weeks must be at least 1", skill)));
            }
            for (field, value) in [("course_cost", entry.course_cost), ("certification_cost", entry.certification_cost)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(AdvisorError::Configuration(format!(
                        "skill '{}': {} must be a non-negative number",
                        skill, field
                    )));
                }
            }

            let cost = SkillCost {
                weeks: entry.weeks,
                course_cost: entry.course_cost,
                certification_cost: entry.certification_cost,
                certification: entry.certification.filter(|c| !c.trim().is_empty()),
                courses: entry.courses,
            };
            if costs.insert(skill.clone(), cost).is_some() {
                return Err(AdvisorError::Configuration(format!("skill '{}' listed twice in cost table", skill)));
            }
        }

        Ok(Self { costs })
    }

    pub fn get(&self, skill: &SkillId) -> Option<&SkillCost> {
        self.costs.get(skill)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_costs() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let table = SkillCostTable::builtin(&taxonomy).unwrap();

        let docker = table.get(&SkillId::new("docker")).unwrap();
        assert_eq!(docker.weeks, 4);
        assert_eq!(docker.certification.as_deref(), Some("Docker Certified Associate"));
        assert!(table.get(&SkillId::new("kotlin")).is_none());
    }

    #[test]
    fn test_synonyms_fold_onto_canonical_ids() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let table = SkillCostTable::from_toml_str("[[skills]]\nskill = \"K8s\"\nweeks = 3\n", &taxonomy).unwrap();
        assert_eq!(table.get(&SkillId::new("kubernetes")).unwrap().weeks, 3);
    }

    #[test]
    fn test_invalid_entries_rejected() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        for content in [
            "[[skills]]\nskill = \"python\"\nweeks = 0\n",
            "[[skills]]\nskill = \"python\"\nweeks = 2\ncourse_cost = -5.0\n",
            "[[skills]]\nskill = \"basket weaving\"\nweeks = 2\n",
            "[[skills]]\nskill = \"python\"\nweeks = 2\n[[skills]]\nskill = \"python3\"\nweeks = 3\n",
            "[[skills]]\nskill = \"python\"\n",
        ] {
            assert!(
                matches!(SkillCostTable::from_toml_str(content, &taxonomy), Err(AdvisorError::Configuration(_))),
                "accepted: {}",
                content
            );
        }
    }
}
