//! Reference data: skill taxonomy, position catalog and skill cost table.
//!
//! The three are loaded together into an immutable [`Catalogs`] value.
//! [`CatalogStore`] hands out `Arc` snapshots so that a reload never changes
//! the data under an evaluation that is already running.

pub mod costs;
pub mod positions;

pub use costs::{SkillCost, SkillCostTable};
pub use positions::{normalize_position_key, CareerStage, PositionCatalog, PositionRequirement};

use crate::config::CatalogConfig;
use crate::error::Result;
use crate::taxonomy::SkillTaxonomy;
use log::info;
use std::sync::{Arc, RwLock};

#[derive(Debug)]
pub struct Catalogs {
    pub taxonomy: Arc<SkillTaxonomy>,
    pub positions: PositionCatalog,
    pub costs: SkillCostTable,
}

impl Catalogs {
    pub fn builtin() -> Result<Self> {
        let taxonomy = SkillTaxonomy::new()?;
        let positions = PositionCatalog::builtin(&taxonomy)?;
        let costs = SkillCostTable::builtin(&taxonomy)?;
        Ok(Self {
            taxonomy: Arc::new(taxonomy),
            positions,
            costs,
        })
    }

    /// Build catalogs from configuration, using the built-in data for any
    /// path that is not set.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let taxonomy = SkillTaxonomy::with_extra_skills(config.extra_skills.clone())?;

        let positions = match &config.positions_path {
            Some(path) => PositionCatalog::load(path, &taxonomy)?,
            None => PositionCatalog::builtin(&taxonomy)?,
        };
        let costs = match &config.skill_costs_path {
            Some(path) => SkillCostTable::load(path, &taxonomy)?,
            None => SkillCostTable::builtin(&taxonomy)?,
        };

        info!(
            "Catalogs ready: {} skills, {} positions, {} skill costs",
            taxonomy.skill_count(),
            positions.len(),
            costs.len()
        );

        Ok(Self {
            taxonomy: Arc::new(taxonomy),
            positions,
            costs,
        })
    }
}

/// Shared, atomically replaceable catalogs.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalogs>>,
}

impl CatalogStore {
    pub fn new(catalogs: Catalogs) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalogs)),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalogs> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in new catalogs. Snapshots taken earlier keep the old data.
    pub fn replace(&self, catalogs: Catalogs) {
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(catalogs);
    }

    /// Rebuild from configuration; on error the current catalogs stay in place.
    pub fn reload(&self, config: &CatalogConfig) -> Result<()> {
        let catalogs = Catalogs::from_config(config)?;
        self.replace(catalogs);
        info!("Catalogs reloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::taxonomy::SkillId;
    use std::io::Write;

    #[test]
    fn test_reload_keeps_existing_snapshots() {
        let store = CatalogStore::new(Catalogs::builtin().unwrap());
        let before = store.snapshot();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[positions]]\nid = \"backend\"\nrequired_skills = [\"rust\", \"sql\"]").unwrap();

        let config = CatalogConfig {
            positions_path: Some(file.path().to_path_buf()),
            ..CatalogConfig::default()
        };
        store.reload(&config).unwrap();

        let after = store.snapshot();
        assert_eq!(before.positions.len(), 5);
        assert_eq!(after.positions.ids(), vec!["backend"]);
        assert!(after.positions.get("backend").unwrap().required_skills.contains(&SkillId::new("rust")));
    }

    #[test]
    fn test_failed_reload_keeps_current_catalogs() {
        let store = CatalogStore::new(Catalogs::builtin().unwrap());
        let config = CatalogConfig {
            positions_path: Some("/nonexistent/positions.toml".into()),
            ..CatalogConfig::default()
        };
        match store.reload(&config) {
            Err(AdvisorError::Configuration(message)) => assert!(message.contains("/nonexistent/positions.toml")),
            other => panic!("expected a configuration error, got {:?}", other),
        }
        assert_eq!(store.snapshot().positions.len(), 5);

        let config = CatalogConfig {
            skill_costs_path: Some("/nonexistent/costs.toml".into()),
            ..CatalogConfig::default()
        };
        assert!(matches!(
            store.reload(&config),
            Err(AdvisorError::Configuration(message)) if message.contains("/nonexistent/costs.toml")
        ));
    }
}
