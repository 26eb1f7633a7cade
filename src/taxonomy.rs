//! Skill taxonomy: canonical skill ids, their synonyms and categories.
//!
//! Every text-matching step goes through this module. Résumé scanning
//! ([`SkillTaxonomy::find_skills`]) and catalog loading
//! ([`SkillTaxonomy::canonicalize`]) share [`normalize_text`] and the same alias
//! table, so a skill recognised in a résumé is recognised identically when it
//! is diffed against a position.

use crate::error::{AdvisorError, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Canonical skill identifier (lower-case, synonym-folded).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    /// Wraps an already-canonical id. Use [`SkillTaxonomy::canonicalize`] for free text.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Programming,
    Web,
    DataScience,
    DevOps,
    Mobile,
    Design,
    ProjectManagement,
    Professional,
    Other,
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkillCategory::Programming => "Programming",
            SkillCategory::Web => "Web",
            SkillCategory::DataScience => "Data Science",
            SkillCategory::DevOps => "DevOps",
            SkillCategory::Mobile => "Mobile",
            SkillCategory::Design => "Design",
            SkillCategory::ProjectManagement => "Project Management",
            SkillCategory::Professional => "Professional",
            SkillCategory::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A skill definition as it appears in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub canonical: String,
    #[serde(default = "default_category")]
    pub category: SkillCategory,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

fn default_category() -> SkillCategory {
    SkillCategory::Other
}

#[derive(Debug, Clone)]
struct SkillEntry {
    id: SkillId,
    category: SkillCategory,
}

/// Static skill dictionary with a case-insensitive multi-pattern matcher.
pub struct SkillTaxonomy {
    entries: Vec<SkillEntry>,
    alias_to_entry: HashMap<String, usize>,
    matcher: AhoCorasick,
    pattern_owner: Vec<usize>,
}

impl fmt::Debug for SkillTaxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkillTaxonomy")
            .field("skills", &self.entries.len())
            .field("aliases", &self.alias_to_entry.len())
            .finish()
    }
}

/// Lower-cases text, keeps the symbols that carry meaning in skill names
/// (`+ # . / -`), turns every other non-alphanumeric character into a space
/// and collapses whitespace.
pub fn normalize_text(text: &str) -> String {
    let mapped: String = text
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '/' | '-') {
                c
            } else {
                ' '
            }
        })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl SkillTaxonomy {
    /// Create a taxonomy with the built-in skill dictionary
    pub fn new() -> Result<Self> {
        Self::with_extra_skills(Vec::new())
    }

    /// Built-in dictionary extended with configured skills. Extra skills are
    /// appended after the built-in ones and so rank after them.
    pub fn with_extra_skills(extra: Vec<SkillDefinition>) -> Result<Self> {
        let mut definitions = Self::default_definitions();
        definitions.extend(extra);
        Self::from_definitions(definitions)
    }

    pub fn from_definitions(definitions: Vec<SkillDefinition>) -> Result<Self> {
        let mut entries: Vec<SkillEntry> = Vec::with_capacity(definitions.len());
        let mut alias_to_entry: HashMap<String, usize> = HashMap::new();
        let mut patterns: Vec<String> = Vec::new();
        let mut pattern_owner: Vec<usize> = Vec::new();

        for definition in definitions {
            let canonical = normalize_text(&definition.canonical);
            if canonical.is_empty() {
                return Err(AdvisorError::Configuration(
                    "skill definition with an empty canonical name".to_string(),
                ));
            }

            let index = entries.len();
            let mut synonyms = vec![canonical.clone()];
            for synonym in &definition.synonyms {
                let normalized = normalize_text(synonym);
                if !normalized.is_empty() && !synonyms.contains(&normalized) {
                    synonyms.push(normalized);
                }
            }

            for synonym in &synonyms {
                if let Some(&existing) = alias_to_entry.get(synonym) {
                    return Err(AdvisorError::Configuration(format!(
                        "synonym '{}' maps to both '{}' and '{}'",
                        synonym, entries[existing].id, canonical
                    )));
                }
                alias_to_entry.insert(synonym.clone(), index);
                patterns.push(synonym.clone());
                pattern_owner.push(index);
            }

            entries.push(SkillEntry {
                id: SkillId::new(canonical),
                category: definition.category,
            });
        }

        // Prefer longer matches so "react native" wins over "react"
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .map_err(|e| AdvisorError::Configuration(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self {
            entries,
            alias_to_entry,
            matcher,
            pattern_owner,
        })
    }

    /// Fold a skill name or synonym onto its canonical id.
    pub fn canonicalize(&self, name: &str) -> Option<SkillId> {
        let normalized = normalize_text(name);
        self.alias_to_entry
            .get(&normalized)
            .map(|&index| self.entries[index].id.clone())
    }

    /// Every canonical skill mentioned in `text`. A hit must be bounded by
    /// non-alphanumeric characters on both sides, allowing a trailing version
    /// number; duplicates count once.
    pub fn find_skills(&self, text: &str) -> BTreeSet<SkillId> {
        let normalized = normalize_text(text);
        let mut found = BTreeSet::new();

        for mat in self.matcher.find_iter(&normalized) {
            if !is_bounded(&normalized, mat.start(), mat.end()) {
                continue;
            }
            let entry = &self.entries[self.pattern_owner[mat.pattern().as_usize()]];
            found.insert(entry.id.clone());
        }

        found
    }

    /// Position of a skill in catalog order; unknown skills sort last.
    pub fn rank(&self, skill: &SkillId) -> usize {
        self.alias_to_entry
            .get(skill.as_str())
            .copied()
            .unwrap_or(usize::MAX)
    }

    pub fn category(&self, skill: &SkillId) -> SkillCategory {
        self.alias_to_entry
            .get(skill.as_str())
            .map(|&index| self.entries[index].category)
            .unwrap_or(SkillCategory::Other)
    }

    /// Bucket skills by category, each bucket in catalog order. Unknown skills
    /// land in [`SkillCategory::Other`].
    pub fn group_by_category<'a>(
        &self,
        skills: impl IntoIterator<Item = &'a SkillId>,
    ) -> BTreeMap<SkillCategory, Vec<SkillId>> {
        let mut groups: BTreeMap<SkillCategory, Vec<SkillId>> = BTreeMap::new();
        for skill in skills {
            groups.entry(self.category(skill)).or_default().push(skill.clone());
        }
        for bucket in groups.values_mut() {
            bucket.sort_by(|a, b| self.rank(a).cmp(&self.rank(b)).then_with(|| a.cmp(b)));
        }
        groups
    }

    /// Sort skills into catalog order (ties broken by id).
    pub fn sort_by_rank(&self, skills: impl IntoIterator<Item = SkillId>) -> Vec<SkillId> {
        let mut sorted: Vec<SkillId> = skills.into_iter().collect();
        sorted.sort_by(|a, b| self.rank(a).cmp(&self.rank(b)).then_with(|| a.cmp(b)));
        sorted
    }

    pub fn skill_count(&self) -> usize {
        self.entries.len()
    }

    fn default_definitions() -> Vec<SkillDefinition> {
        use SkillCategory::*;

        let table: &[(&str, SkillCategory, &[&str])] = &[
            // Programming languages
            ("python", Programming, &["python3", "python 3"]),
            ("java", Programming, &["java8", "java11", "java17", "openjdk"]),
            ("javascript", Programming, &["js", "java script", "ecmascript", "es6"]),
            ("typescript", Programming, &["ts", "type script"]),
            ("c++", Programming, &["cpp", "c plus plus"]),
            ("c#", Programming, &["csharp", "c sharp"]),
            ("golang", Programming, &["go lang", "go language"]),
            ("rust", Programming, &["rust lang", "rust language"]),
            ("php", Programming, &["php7", "php8"]),
            ("ruby", Programming, &["ruby on rails", "rails"]),
            ("swift", Programming, &["swiftui"]),
            ("kotlin", Programming, &[]),
            ("bash", Programming, &["shell scripting", "shell script"]),
            ("programming", Programming, &["software development", "coding"]),
            // Web
            ("html", Web, &["html5"]),
            ("css", Web, &["css3", "scss", "sass"]),
            ("react", Web, &["reactjs", "react.js", "react js"]),
            ("angular", Web, &["angularjs", "angular.js"]),
            ("vue", Web, &["vuejs", "vue.js", "vue js"]),
            ("nodejs", Web, &["node.js", "node js"]),
            ("django", Web, &["django rest framework"]),
            ("flask", Web, &[]),
            ("spring", Web, &["spring boot", "springboot"]),
            ("laravel", Web, &[]),
            ("graphql", Web, &[]),
            ("webpack", Web, &[]),
            ("responsive design", Web, &["responsive web design"]),
            ("microservices", Web, &["microservice architecture", "micro services"]),
            // Data science
            ("sql", DataScience, &["mysql", "postgresql", "postgres", "t-sql", "pl/sql"]),
            ("nosql", DataScience, &["mongodb", "cassandra"]),
            ("statistics", DataScience, &["statistical analysis", "statistical modeling"]),
            ("machine learning", DataScience, &["ml"]),
            ("deep learning", DataScience, &["neural networks"]),
            ("nlp", DataScience, &["natural language processing"]),
            ("tensorflow", DataScience, &[]),
            ("pytorch", DataScience, &["torch"]),
            ("keras", DataScience, &[]),
            ("scikit-learn", DataScience, &["sklearn", "scikit learn"]),
            ("pandas", DataScience, &[]),
            ("numpy", DataScience, &[]),
            ("matplotlib", DataScience, &[]),
            ("seaborn", DataScience, &[]),
            ("data analysis", DataScience, &["data analytics"]),
            ("data visualization", DataScience, &["data visualisation", "dataviz"]),
            ("tableau", DataScience, &[]),
            ("powerbi", DataScience, &["power bi"]),
            ("excel", DataScience, &["microsoft excel", "ms excel", "spreadsheets"]),
            ("mlops", DataScience, &["ml ops"]),
            // DevOps and infrastructure
            ("linux", DevOps, &["ubuntu", "debian", "centos", "red hat"]),
            ("docker", DevOps, &["containerization", "dockerfile"]),
            ("kubernetes", DevOps, &["k8s"]),
            ("cloud", DevOps, &["cloud computing", "cloud infrastructure"]),
            ("aws", DevOps, &["amazon web services"]),
            ("azure", DevOps, &["microsoft azure"]),
            ("gcp", DevOps, &["google cloud platform", "google cloud"]),
            ("terraform", DevOps, &[]),
            ("ansible", DevOps, &[]),
            ("jenkins", DevOps, &[]),
            ("gitlab", DevOps, &["gitlab ci"]),
            ("ci/cd", DevOps, &["cicd", "ci cd", "continuous integration", "continuous delivery", "continuous deployment"]),
            ("git", DevOps, &["github", "version control"]),
            ("monitoring", DevOps, &["observability", "prometheus", "grafana"]),
            ("security", DevOps, &["cybersecurity", "devsecops", "application security"]),
            // Mobile
            ("mobile development", Mobile, &["mobile app development", "ios development", "android development", "native development"]),
            ("react native", Mobile, &[]),
            ("flutter", Mobile, &["dart"]),
            ("xcode", Mobile, &[]),
            ("android studio", Mobile, &[]),
            ("firebase", Mobile, &[]),
            // Design
            ("design", Design, &["graphic design", "visual design"]),
            ("ui/ux", Design, &["ui ux", "ux/ui", "ui design", "ux design", "user experience", "user interface design"]),
            ("figma", Design, &[]),
            ("sketch", Design, &[]),
            ("adobe xd", Design, &[]),
            ("invision", Design, &[]),
            ("adobe creative suite", Design, &["adobe creative cloud", "creative suite"]),
            ("photoshop", Design, &["adobe photoshop"]),
            ("illustrator", Design, &["adobe illustrator"]),
            ("prototyping", Design, &["prototype design"]),
            ("wireframing", Design, &["wireframes"]),
            ("user research", Design, &["usability testing"]),
            ("design systems", Design, &["design system"]),
            // Project management
            ("agile", ProjectManagement, &[]),
            ("scrum", ProjectManagement, &["scrum master"]),
            ("kanban", ProjectManagement, &[]),
            ("pmp", ProjectManagement, &[]),
            ("project management", ProjectManagement, &[]),
            ("stakeholder management", ProjectManagement, &[]),
            ("risk management", ProjectManagement, &[]),
            ("jira", ProjectManagement, &[]),
            ("confluence", ProjectManagement, &[]),
            // Professional
            ("leadership", Professional, &["team leadership", "team lead"]),
            ("mentoring", Professional, &["mentorship", "coaching"]),
            ("communication", Professional, &["communication skills"]),
            ("problem solving", Professional, &["problem-solving"]),
            ("strategic thinking", Professional, &["strategy", "strategic planning"]),
            ("architecture", Professional, &["software architecture", "system design", "solution architecture"]),
            ("performance", Professional, &["performance optimization", "performance tuning"]),
        ];

        table
            .iter()
            .map(|(canonical, category, synonyms)| SkillDefinition {
                canonical: canonical.to_string(),
                category: *category,
                synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            })
            .collect()
    }
}

/// A version number directly after a skill ("c++17", "python2") still counts
/// as a boundary.
fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].trim_start_matches(|c: char| c.is_ascii_digit()).chars().next();
    !before.map_or(false, |c| c.is_alphanumeric()) && !after.map_or(false, |c| c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(skills: &BTreeSet<SkillId>) -> Vec<&str> {
        skills.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_normalize_text_keeps_skill_symbols() {
        assert_eq!(normalize_text("  C++, C# & Node.js!  "), "c++ c# node.js");
        assert_eq!(normalize_text("CI/CD\tpipelines"), "ci/cd pipelines");
        assert_eq!(normalize_text("mobile_development"), "mobile development");
    }

    #[test]
    fn test_canonicalize_folds_synonyms() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        assert_eq!(taxonomy.canonicalize("JS"), Some(SkillId::new("javascript")));
        assert_eq!(taxonomy.canonicalize("JavaScript"), Some(SkillId::new("javascript")));
        assert_eq!(taxonomy.canonicalize("K8s"), Some(SkillId::new("kubernetes")));
        assert_eq!(taxonomy.canonicalize("strategy"), Some(SkillId::new("strategic thinking")));
        assert_eq!(taxonomy.canonicalize("underwater basket weaving"), None);
    }

    #[test]
    fn test_find_skills_respects_token_boundaries() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.find_skills("Built JavaScript apps; Pythonic style; some Java too.");
        assert!(skills.contains(&SkillId::new("javascript")));
        assert!(skills.contains(&SkillId::new("java")));
        assert!(!skills.contains(&SkillId::new("python")));
    }

    #[test]
    fn test_find_skills_accepts_version_suffixes() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.find_skills("Expert in C++17 and Python2, some Python3.11 scripting");
        assert!(skills.contains(&SkillId::new("c++")));
        assert!(skills.contains(&SkillId::new("python")));

        let skills = taxonomy.find_skills("python2x and 3python");
        assert!(!skills.contains(&SkillId::new("python")));
    }

    #[test]
    fn test_group_by_category() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.find_skills("SQL, Python, Docker, Scrum, and some Klingon");
        let groups = taxonomy.group_by_category(&skills);

        assert_eq!(groups[&SkillCategory::Programming], vec![SkillId::new("python")]);
        assert_eq!(groups[&SkillCategory::DataScience], vec![SkillId::new("sql")]);
        assert_eq!(groups[&SkillCategory::DevOps], vec![SkillId::new("docker")]);
        assert_eq!(groups[&SkillCategory::ProjectManagement], vec![SkillId::new("scrum")]);
        assert_eq!(groups.len(), 4);

        let unknown = [SkillId::new("klingon")];
        let groups = taxonomy.group_by_category(&unknown);
        assert_eq!(groups[&SkillCategory::Other], vec![SkillId::new("klingon")]);
    }

    #[test]
    fn test_find_skills_prefers_longest_and_dedups() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.find_skills("React Native, react native and REACT NATIVE");
        assert_eq!(ids(&skills), vec!["react native"]);
    }

    #[test]
    fn test_find_skills_on_symbols() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.find_skills("Languages: C++/C#, Node.js. Pipelines: CI/CD with Jenkins");
        for expected in ["c++", "c#", "nodejs", "ci/cd", "jenkins"] {
            assert!(skills.contains(&SkillId::new(expected)), "missing {}", expected);
        }
    }

    #[test]
    fn test_duplicate_synonym_is_configuration_error() {
        let result = SkillTaxonomy::with_extra_skills(vec![SkillDefinition {
            canonical: "ecmascript-next".to_string(),
            category: SkillCategory::Programming,
            synonyms: vec!["js".to_string()],
        }]);
        assert!(matches!(result, Err(AdvisorError::Configuration(_))));
    }

    #[test]
    fn test_rank_follows_catalog_order() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let python = SkillId::new("python");
        let docker = SkillId::new("docker");
        assert!(taxonomy.rank(&python) < taxonomy.rank(&docker));
        assert_eq!(taxonomy.rank(&SkillId::new("not-a-skill")), usize::MAX);

        let sorted = taxonomy.sort_by_rank(vec![docker.clone(), python.clone()]);
        assert_eq!(sorted, vec![python, docker]);
    }
}
