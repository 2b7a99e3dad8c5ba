//! # bookmarks-init - Setup utility for the bookmarks service
//!
//! Prepares a fresh deployment of the bookmarks application:
//! - Versioned SQLite schema (users, settings, bookmarks, favicons, tags)
//! - Ordered upgrade chain keyed on the `DbVersion` marker
//! - Session-signing secret generation into a `.env` file

pub mod config;
pub mod init;
pub mod secret;
pub mod storage;
pub mod ui;
pub mod output;

// Re-exports for convenient access
pub use config::SetupConfig;
pub use init::{InitReport, Initializer};
pub use storage::{get_version, initialize_v1, SchemaStore};

/// Result type alias for setup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for setup operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration missing: {0}")]
    ConfigMissing(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
