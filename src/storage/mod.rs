//! Storage Layer - SQLite schema for the bookmarks service
//!
//! Tables, created in this order:
//! - DbVersion(version): single-row schema marker
//! - Users(uuid, username, email, password_hash, salt, ...)
//! - UserSettings(user_uuid, setting_name, value)
//! - Favicons(domain, image, content_type, last_updated)
//! - Bookmarks(uuid, user_uuid, url, name, is_folder, parent_uuid, ...)
//! - Tags(uuid, user_uuid, name, color)
//! - BookmarkTags(bookmark_uuid, tag_uuid)

pub mod migrations;
pub mod schema;
pub mod sqlite;

use std::path::Path;

use tracing::{error, info};

use crate::Result;

pub use schema::LATEST_VERSION;
pub use sqlite::{DbStats, SchemaObjects, SchemaStore, TableCount};

/// Read the schema version stored at `path`
///
/// A missing file, a missing marker table and an empty marker table all read
/// as `None`. The file is never created. Any other engine fault is returned.
pub fn get_version(path: &Path) -> Result<Option<i64>> {
    if !path.exists() {
        return Ok(None);
    }
    let result = SchemaStore::open_read_only(path).and_then(|store| store.version());
    if let Err(e) = &result {
        error!("Error getting database version from {}: {}", path.display(), e);
    }
    result
}

/// Create the v1 schema at `path`, creating the file if needed
///
/// The whole schema is written in one transaction; on error nothing is left
/// behind and the error is returned after being logged.
pub fn initialize_v1(path: &Path) -> Result<()> {
    crate::config::ensure_db_dir(path)?;

    let result = SchemaStore::open(path).and_then(|mut store| store.initialize_v1());
    match &result {
        Ok(()) => info!("Initialized schema version 1 at {}", path.display()),
        Err(e) => error!("Error initializing database at {}: {}", path.display(), e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_version_missing_file_not_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookmarks.db");

        assert_eq!(get_version(&path).unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_get_version_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookmarks.db");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(get_version(&path).unwrap(), None);
    }

    #[test]
    fn test_get_version_reports_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookmarks.db");
        std::fs::write(&path, vec![b'x'; 4096]).unwrap();

        assert!(matches!(get_version(&path), Err(crate::Error::Storage(_))));
    }

    #[test]
    fn test_initialize_twice_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("bookmarks.db");

        initialize_v1(&path).unwrap();
        assert_eq!(get_version(&path).unwrap(), Some(1));

        initialize_v1(&path).unwrap();
        assert_eq!(get_version(&path).unwrap(), Some(1));

        let store = SchemaStore::open(&path).unwrap();
        assert_eq!(migrations::version_rows(store.connection()).unwrap(), 1);
        assert!(store.missing_objects().unwrap().is_empty());
    }

    #[test]
    fn test_initialize_fails_on_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookmarks.db");
        std::fs::write(&path, vec![b'x'; 4096]).unwrap();

        assert!(initialize_v1(&path).is_err());
    }
}
