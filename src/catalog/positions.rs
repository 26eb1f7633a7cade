//! Position catalog: role requirements keyed by position id

use crate::error::{AdvisorError, Result};
use crate::profile::EducationLevel;
use crate::taxonomy::{SkillId, SkillTaxonomy};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

const BUILTIN_POSITIONS: &str = include_str!("default_positions.toml");

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion
const SUGGESTION_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerStage {
    pub level: String,
    pub skills: BTreeSet<SkillId>,
}

/// Requirements for one role. Skill tiers hold canonical ids only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRequirement {
    pub id: String,
    pub title: String,
    pub aliases: Vec<String>,
    pub required_skills: BTreeSet<SkillId>,
    pub advanced_skills: BTreeSet<SkillId>,
    pub tool_skills: BTreeSet<SkillId>,
    pub min_years: f64,
    pub min_education: EducationLevel,
    /// Ordered from entry level to most senior
    pub career_progression: Vec<CareerStage>,
    pub certifications: Vec<String>,
}

impl PositionRequirement {
    /// Advanced and tool skills together.
    pub fn preferred_skills(&self) -> BTreeSet<SkillId> {
        self.advanced_skills.union(&self.tool_skills).cloned().collect()
    }
}

/// A position as written in a catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionDefinition {
    pub id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub advanced_skills: Vec<String>,
    #[serde(default)]
    pub tool_skills: Vec<String>,
    #[serde(default)]
    pub min_years: f64,
    #[serde(default)]
    pub min_education: EducationLevel,
    #[serde(default)]
    pub career_progression: Vec<CareerStageDefinition>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CareerStageDefinition {
    pub level: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PositionFile {
    #[serde(default)]
    positions: Vec<PositionDefinition>,
}

#[derive(Debug, Clone)]
pub struct PositionCatalog {
    positions: Vec<PositionRequirement>,
    lookup: HashMap<String, usize>,
}

/// Lower-case, `_`-separated key used for ids and aliases
/// (`"Data Scientist"` → `data_scientist`).
pub fn normalize_position_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

impl PositionCatalog {
    pub fn builtin(taxonomy: &SkillTaxonomy) -> Result<Self> {
        Self::from_toml_str(BUILTIN_POSITIONS, taxonomy)
            .map_err(|e| AdvisorError::Configuration(format!("built-in position catalog: {}", e)))
    }

    pub fn load(path: &Path, taxonomy: &SkillTaxonomy) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AdvisorError::Configuration(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_toml_str(&content, taxonomy)
            .map_err(|e| AdvisorError::Configuration(format!("{}: {}", path.display(), e)))?;
        info!("Loaded {} positions from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn from_toml_str(content: &str, taxonomy: &SkillTaxonomy) -> Result<Self> {
        let file: PositionFile = toml::from_str(content)?;
        Self::from_definitions(file.positions, taxonomy)
    }

    pub fn from_definitions(definitions: Vec<PositionDefinition>, taxonomy: &SkillTaxonomy) -> Result<Self> {
        if definitions.is_empty() {
            return Err(AdvisorError::Configuration("position catalog is empty".to_string()));
        }

        let mut positions = Vec::with_capacity(definitions.len());
        let mut lookup = HashMap::new();

        for definition in definitions {
            let position = build_position(definition, taxonomy)?;
            let index = positions.len();

            for key in std::iter::once(&position.id).chain(position.aliases.iter()) {
                if let Some(&existing) = lookup.get(key) {
                    if existing == index {
                        continue;
                    }
                    let owner: &PositionRequirement = &positions[existing];
                    return Err(AdvisorError::Configuration(format!(
                        "position name '{}' is used by both '{}' and '{}'",
                        key, owner.id, position.id
                    )));
                }
                lookup.insert(key.clone(), index);
            }

            debug!(
                "Position {}: {} required, {} advanced, {} tools",
                position.id,
                position.required_skills.len(),
                position.advanced_skills.len(),
                position.tool_skills.len()
            );
            positions.push(position);
        }

        Ok(Self { positions, lookup })
    }

    /// Look up a position by id, alias or display title.
    pub fn get(&self, name: &str) -> Result<&PositionRequirement> {
        let key = normalize_position_key(name);
        match self.lookup.get(&key) {
            Some(&index) => Ok(&self.positions[index]),
            None => Err(AdvisorError::UnknownPosition {
                position: name.to_string(),
                suggestion: self.suggest(&key),
            }),
        }
    }

    /// Position ids in catalog order.
    pub fn ids(&self) -> Vec<String> {
        self.positions.iter().map(|p| p.id.clone()).collect()
    }

    pub fn positions(&self) -> &[PositionRequirement] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn suggest(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }

        self.lookup
            .iter()
            .map(|(name, &index)| (strsim::jaro_winkler(key, name), name, index))
            .filter(|(score, _, _)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.0.total_cmp(&b.0).then_with(|| b.1.cmp(a.1)))
            .map(|(_, _, index)| self.positions[index].id.clone())
    }
}

fn build_position(definition: PositionDefinition, taxonomy: &SkillTaxonomy) -> Result<PositionRequirement> {
    let id = normalize_position_key(&definition.id);
    if id.is_empty() {
        return Err(AdvisorError::Configuration("position id must not be empty".to_string()));
    }
    if !definition.min_years.is_finite() || definition.min_years < 0.0 {
        return Err(AdvisorError::Configuration(format!(
            "position '{}': min_years must be a non-negative number",
            id
        )));
    }

    let canonical = |names: &[String], field: &str| -> Result<BTreeSet<SkillId>> {
        names
            .iter()
            .map(|name| {
                taxonomy.canonicalize(name).ok_or_else(|| {
                    AdvisorError::Configuration(format!("position '{}': unknown skill '{}' in {}", id, name, field))
                })
            })
            .collect()
    };

    let required_skills = canonical(&definition.required_skills, "required_skills")?;
    let advanced_skills = canonical(&definition.advanced_skills, "advanced_skills")?;
    let tool_skills = canonical(&definition.tool_skills, "tool_skills")?;

    let career_progression = definition
        .career_progression
        .iter()
        .map(|stage| {
            Ok(CareerStage {
                level: stage.level.trim().to_lowercase(),
                skills: canonical(&stage.skills, "career_progression")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut aliases: Vec<String> = definition
        .aliases
        .iter()
        .map(|alias| normalize_position_key(alias))
        .filter(|alias| !alias.is_empty() && *alias != id)
        .collect();
    let title = definition.title.unwrap_or_else(|| definition.id.clone());
    let title_key = normalize_position_key(&title);
    if title_key != id && !aliases.contains(&title_key) {
        aliases.push(title_key);
    }
    aliases.dedup();

    Ok(PositionRequirement {
        id,
        title,
        aliases,
        required_skills,
        advanced_skills,
        tool_skills,
        min_years: definition.min_years,
        min_education: definition.min_education,
        career_progression,
        certifications: definition.certifications,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> SkillTaxonomy {
        SkillTaxonomy::new().unwrap()
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = PositionCatalog::builtin(&taxonomy()).unwrap();
        assert_eq!(
            catalog.ids(),
            vec!["data_science", "web_development", "devops", "mobile_development", "ui_ux_design"]
        );

        let mobile = catalog.get("mobile_development").unwrap();
        assert!(mobile.required_skills.contains(&SkillId::new("mobile development")));
        let lead = mobile.career_progression.last().unwrap();
        assert!(lead.skills.contains(&SkillId::new("strategic thinking")));
    }

    #[test]
    fn test_lookup_by_alias_and_title() {
        let catalog = PositionCatalog::builtin(&taxonomy()).unwrap();
        assert_eq!(catalog.get("Data Scientist").unwrap().id, "data_science");
        assert_eq!(catalog.get("frontend-developer").unwrap().id, "web_development");
        assert_eq!(catalog.get("DevOps Engineer").unwrap().id, "devops");
        assert_eq!(catalog.get(" UI/UX Designer ").unwrap().id, "ui_ux_design");
    }

    #[test]
    fn test_unknown_position_suggests_closest() {
        let catalog = PositionCatalog::builtin(&taxonomy()).unwrap();
        match catalog.get("devopz") {
            Err(AdvisorError::UnknownPosition { position, suggestion }) => {
                assert_eq!(position, "devopz");
                assert_eq!(suggestion.as_deref(), Some("devops"));
            }
            other => panic!("expected UnknownPosition, got {:?}", other),
        }

        match catalog.get("astronaut") {
            Err(AdvisorError::UnknownPosition { suggestion, .. }) => assert!(suggestion.is_none()),
            other => panic!("expected UnknownPosition, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_skill_is_configuration_error() {
        let content = r#"
[[positions]]
id = "alchemist"
required_skills = ["python", "transmutation"]
"#;
        let err = PositionCatalog::from_toml_str(content, &taxonomy()).unwrap_err();
        assert!(matches!(err, AdvisorError::Configuration(ref msg) if msg.contains("transmutation")));
    }

    #[test]
    fn test_missing_required_field_is_configuration_error() {
        let content = "[[positions]]\nid = \"backend\"\n";
        assert!(matches!(
            PositionCatalog::from_toml_str(content, &taxonomy()),
            Err(AdvisorError::Configuration(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let content = r#"
[[positions]]
id = "backend"
required_skills = ["python"]

[[positions]]
id = "Backend"
required_skills = ["java"]
"#;
        assert!(matches!(
            PositionCatalog::from_toml_str(content, &taxonomy()),
            Err(AdvisorError::Configuration(_))
        ));
    }

    #[test]
    fn test_negative_years_rejected() {
        let content = "[[positions]]\nid = \"backend\"\nrequired_skills = [\"python\"]\nmin_years = -1.0\n";
        assert!(matches!(
            PositionCatalog::from_toml_str(content, &taxonomy()),
            Err(AdvisorError::Configuration(_))
        ));
    }
}
