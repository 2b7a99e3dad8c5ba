//! Schema upgrade chain
//!
//! Each step moves the database from `version - 1` to `version`. Steps run in
//! order, one transaction each, and the `DbVersion` row is updated in the same
//! transaction as the step itself.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use super::schema::{V1_INDEXES, V1_TABLES};
use crate::Result;

/// One upgrade step in the chain
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub apply: fn(&Connection) -> Result<()>,
}

impl std::fmt::Debug for Migration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("description", &self.description)
            .finish()
    }
}

/// Known upgrade steps, ordered by version
///
/// A v2 step goes here as `Migration { version: 2, .. }` together with a bump
/// of `schema::LATEST_VERSION`.
pub static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "users, settings, bookmarks, favicons and tags",
    apply: create_v1_objects,
}];

/// Steps that take a database at `current` up to `target`, in order
pub fn pending(current: i64, target: i64) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |m| m.version > current && m.version <= target)
}

/// Create every v1 table and index that does not exist yet
pub fn create_v1_objects(conn: &Connection) -> Result<()> {
    for (name, ddl) in V1_TABLES {
        create_if_absent(conn, "table", name, ddl)?;
    }
    for (name, ddl) in V1_INDEXES {
        create_if_absent(conn, "index", name, ddl)?;
    }
    Ok(())
}

/// Returns true if the object was created
fn create_if_absent(conn: &Connection, kind: &str, name: &str, ddl: &str) -> Result<bool> {
    if object_exists(conn, kind, name)? {
        debug!("{} {} already present", kind, name);
        return Ok(false);
    }
    conn.execute(ddl, [])?;
    debug!("Created {} {}", kind, name);
    Ok(true)
}

/// Check `sqlite_master` for a table or index by name
///
/// SQLite identifiers are case-insensitive, so `users` satisfies `Users`.
pub fn object_exists(conn: &Connection, kind: &str, name: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2 COLLATE NOCASE",
            [kind, name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Number of rows in the version marker table
pub fn version_rows(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM DbVersion", [], |row| row.get(0))?;
    Ok(count as usize)
}

/// Record `version` as the single marker row
pub fn set_version(conn: &Connection, version: i64) -> Result<()> {
    let updated = conn.execute("UPDATE DbVersion SET version = ?1", [version])?;
    if updated == 0 {
        conn.execute("INSERT INTO DbVersion (version) VALUES (?1)", [version])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::LATEST_VERSION;

    #[test]
    fn test_chain_is_contiguous_up_to_latest() {
        let versions: Vec<i64> = MIGRATIONS.iter().map(|m| m.version).collect();
        let expected: Vec<i64> = (1..=LATEST_VERSION).collect();
        assert_eq!(versions, expected);
    }

    #[test]
    fn test_pending_selects_half_open_range() {
        assert_eq!(pending(0, 1).map(|m| m.version).collect::<Vec<_>>(), vec![1]);
        assert_eq!(pending(1, 1).count(), 0);
        assert_eq!(pending(0, 0).count(), 0);
    }

    #[test]
    fn test_create_v1_objects_twice() {
        let conn = Connection::open_in_memory().unwrap();
        create_v1_objects(&conn).unwrap();
        create_v1_objects(&conn).unwrap();

        assert!(object_exists(&conn, "table", "Bookmarks").unwrap());
        assert!(object_exists(&conn, "index", "idx_bookmarks_folder_order").unwrap());
        assert!(!object_exists(&conn, "index", "Bookmarks").unwrap());
    }

    #[test]
    fn test_object_exists_ignores_case() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE favicons (domain TEXT PRIMARY KEY)").unwrap();

        assert!(object_exists(&conn, "table", "Favicons").unwrap());
        assert!(object_exists(&conn, "table", "FAVICONS").unwrap());
    }

    #[test]
    fn test_set_version_keeps_single_row() {
        let conn = Connection::open_in_memory().unwrap();
        create_v1_objects(&conn).unwrap();

        set_version(&conn, 1).unwrap();
        set_version(&conn, 2).unwrap();

        assert_eq!(version_rows(&conn).unwrap(), 1);
        let version: i64 = conn
            .query_row("SELECT version FROM DbVersion", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 2);
    }
}
