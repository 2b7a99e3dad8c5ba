use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Environment variable naming the database file
pub const DATABASE_PATH_VAR: &str = "BOOKMARKS_DATABASE_PATH";

/// Shown when no database location could be resolved
pub const MISSING_DATABASE_HINT: &str =
    "copy .env.example to .env and fill BOOKMARKS_DATABASE_PATH";

/// Optional on-disk configuration (`bookmarks.toml`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BookmarksConfig {
    pub database: Option<String>,
}

/// Everything the setup commands need, resolved up front
#[derive(Debug, Clone)]
pub struct SetupConfig {
    pub database_path: PathBuf,
}

impl SetupConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
        }
    }

    /// Resolve from a CLI override, the environment (after loading
    /// `env_file`) and the optional config file, in that order
    pub fn from_sources(
        cli_database: Option<PathBuf>,
        env_file: &Path,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        load_env_file(env_file)?;
        let file_config = load_config(config_path)?;
        let database_path = resolve_database_path(
            cli_database,
            std::env::var(DATABASE_PATH_VAR).ok(),
            file_config.as_ref(),
        )?;
        Ok(Self::new(database_path))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("bookmarks.toml")
}

/// Pick the database path from the first source that names one
pub fn resolve_database_path(
    cli_database: Option<PathBuf>,
    env_value: Option<String>,
    file_config: Option<&BookmarksConfig>,
) -> Result<PathBuf> {
    let non_empty = |s: &String| !s.trim().is_empty();

    cli_database
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| env_value.filter(non_empty).map(PathBuf::from))
        .or_else(|| {
            file_config
                .and_then(|c| c.database.clone())
                .filter(non_empty)
                .map(PathBuf::from)
        })
        .ok_or_else(|| Error::ConfigMissing(MISSING_DATABASE_HINT.to_string()))
}

/// Load `KEY=value` pairs into the process environment
///
/// Variables already set in the environment win. A missing file is fine.
pub fn load_env_file(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::Config(format!("{}: {}", path.display(), e))),
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Option<BookmarksConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: BookmarksConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
