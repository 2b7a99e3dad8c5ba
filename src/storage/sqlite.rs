//! SQLite storage implementation

use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension, TransactionBehavior};
use serde::Serialize;
use tracing::info;

use super::migrations::{self, object_exists};
use super::schema::{self, LATEST_VERSION, V1_INDEXES, V1_TABLES};
use crate::{Error, Result};

/// A connection to the bookmarks database, scoped to one unit of setup work
pub struct SchemaStore {
    conn: Connection,
}

impl SchemaStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an existing database file without write access
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(schema::CONNECTION_PRAGMAS)?;
        Ok(Self { conn })
    }

    /// Underlying connection, for callers that work with the rows themselves
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Stored schema version, `None` if the marker table or row is missing
    pub fn version(&self) -> Result<Option<i64>> {
        let result = self
            .conn
            .query_row("SELECT version FROM DbVersion LIMIT 1", [], |row| row.get(0))
            .optional();

        match result {
            Ok(version) => Ok(version),
            Err(err) if is_missing_table(&err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Create the v1 schema in a single transaction
    ///
    /// Objects that already exist are left alone and the version row is only
    /// written when the marker table is empty, so this is safe to repeat.
    pub fn initialize_v1(&mut self) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        migrations::create_v1_objects(&tx)?;
        if migrations::version_rows(&tx)? == 0 {
            tx.execute("INSERT INTO DbVersion (version) VALUES (1)", [])?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Apply every upgrade step between the stored version and `target`
    ///
    /// Returns the versions that were applied. A database already at or past
    /// `target` is left untouched.
    pub fn migrate_to(&mut self, target: i64) -> Result<Vec<i64>> {
        if !(0..=LATEST_VERSION).contains(&target) {
            return Err(Error::Migration(format!(
                "target version {} is not known (latest is {})",
                target, LATEST_VERSION
            )));
        }

        let current = self.version()?.unwrap_or(0);
        if current > LATEST_VERSION {
            return Err(Error::Migration(format!(
                "database is at version {}, newer than this tool supports ({})",
                current, LATEST_VERSION
            )));
        }

        let mut applied = Vec::new();
        for migration in migrations::pending(current, target) {
            let tx = self
                .conn
                .transaction_with_behavior(TransactionBehavior::Immediate)?;
            (migration.apply)(&tx)?;
            migrations::set_version(&tx, migration.version)?;
            tx.commit()?;

            info!(
                "Applied schema version {} ({})",
                migration.version, migration.description
            );
            applied.push(migration.version);
        }

        Ok(applied)
    }

    /// Tables and indexes currently present, excluding SQLite internals
    pub fn schema_objects(&self) -> Result<SchemaObjects> {
        let mut stmt = self.conn.prepare(
            "SELECT type, name FROM sqlite_master
             WHERE type IN ('table', 'index') AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;

        let mut objects = SchemaObjects::default();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (kind, name) = row?;
            if kind == "table" {
                objects.tables.push(name);
            } else {
                objects.indexes.push(name);
            }
        }

        Ok(objects)
    }

    /// Declared v1 tables and indexes that are not present
    pub fn missing_objects(&self) -> Result<Vec<&'static str>> {
        let mut missing = Vec::new();
        for (name, _) in V1_TABLES {
            if !object_exists(&self.conn, "table", name)? {
                missing.push(*name);
            }
        }
        for (name, _) in V1_INDEXES {
            if !object_exists(&self.conn, "index", name)? {
                missing.push(*name);
            }
        }
        Ok(missing)
    }

    /// Row counts for every v1 table that exists
    pub fn stats(&self) -> Result<DbStats> {
        let mut tables = Vec::new();
        for (name, _) in V1_TABLES {
            if !object_exists(&self.conn, "table", name)? {
                continue;
            }
            let count: i64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", name),
                [],
                |row| row.get(0),
            )?;
            tables.push(TableCount {
                table: name.to_string(),
                rows: count as usize,
            });
        }
        Ok(DbStats { tables })
    }
}

fn is_missing_table(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.starts_with("no such table"),
        rusqlite::Error::SqlInputError { msg, .. } => msg.starts_with("no such table"),
        _ => false,
    }
}

/// Schema objects found in `sqlite_master`
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaObjects {
    pub tables: Vec<String>,
    pub indexes: Vec<String>,
}

/// Row count for one table
#[derive(Debug, Clone, Serialize)]
pub struct TableCount {
    pub table: String,
    pub rows: usize,
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub tables: Vec<TableCount>,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        for count in &self.tables {
            writeln!(f, "  {}: {}", count.table, count.rows)?;
        }
        Ok(())
    }
}
