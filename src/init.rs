//! Setup orchestration: bring the configured database up to the latest schema

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SetupConfig;
use crate::storage::{self, SchemaStore, LATEST_VERSION};
use crate::{Error, Result};

/// Outcome of one initializer run
#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    pub database: PathBuf,
    /// True if the schema was absent and v1 was created by this run
    pub created: bool,
    /// Upgrade steps applied after creation
    pub applied: Vec<i64>,
    pub version: i64,
}

impl InitReport {
    /// Stored version is ahead of every upgrade step this build knows
    pub fn is_newer_than_supported(&self) -> bool {
        self.version > LATEST_VERSION
    }
}

pub struct Initializer {
    config: SetupConfig,
}

impl Initializer {
    pub fn new(config: SetupConfig) -> Self {
        Self { config }
    }

    /// Current version without touching the database
    pub fn current_version(&self) -> Result<Option<i64>> {
        storage::get_version(&self.config.database_path)
    }

    /// Create the schema if absent, apply pending upgrades, report the result
    pub fn run(&self) -> Result<InitReport> {
        let path = &self.config.database_path;

        let created = match self.current_version()? {
            Some(version) if version > LATEST_VERSION => {
                warn!(
                    "{} is at version {}, newer than this tool supports ({}); leaving it untouched",
                    path.display(),
                    version,
                    LATEST_VERSION
                );
                return Ok(InitReport {
                    database: path.clone(),
                    created: false,
                    applied: Vec::new(),
                    version,
                });
            }
            Some(version) => {
                debug!("{} already at version {}", path.display(), version);
                false
            }
            None => {
                info!("Creating database at {}", path.display());
                storage::initialize_v1(path)?;
                true
            }
        };

        let applied = {
            let mut store = SchemaStore::open(path)?;
            store.migrate_to(LATEST_VERSION)?
        };

        let version = self.current_version()?.ok_or_else(|| {
            Error::Migration(format!(
                "{} has no version marker after initialization",
                path.display()
            ))
        })?;

        Ok(InitReport {
            database: path.clone(),
            created,
            applied,
            version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_run_creates_then_reports_existing() {
        let dir = TempDir::new().unwrap();
        let initializer = Initializer::new(SetupConfig::new(dir.path().join("bookmarks.db")));

        assert_eq!(initializer.current_version().unwrap(), None);

        let first = initializer.run().unwrap();
        assert!(first.created);
        assert!(first.applied.is_empty());
        assert_eq!(first.version, 1);
        assert!(!first.is_newer_than_supported());

        let second = initializer.run().unwrap();
        assert!(!second.created);
        assert!(second.applied.is_empty());
        assert_eq!(second.version, 1);
    }

    #[test]
    fn test_newer_database_is_reported_not_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookmarks.db");
        storage::initialize_v1(&path).unwrap();
        {
            let store = SchemaStore::open(&path).unwrap();
            storage::migrations::set_version(store.connection(), LATEST_VERSION + 1).unwrap();
        }

        let report = Initializer::new(SetupConfig::new(&path)).run().unwrap();
        assert!(!report.created);
        assert!(report.applied.is_empty());
        assert_eq!(report.version, LATEST_VERSION + 1);
        assert!(report.is_newer_than_supported());
        assert_eq!(storage::get_version(&path).unwrap(), Some(LATEST_VERSION + 1));
    }

    #[test]
    fn test_run_on_unreadable_database_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookmarks.db");
        std::fs::write(&path, vec![b'x'; 4096]).unwrap();

        let initializer = Initializer::new(SetupConfig::new(&path));
        assert!(matches!(initializer.run(), Err(Error::Storage(_))));
    }
}
