//! SQLite access for the `user_data` table

use rusqlite::{Connection, OpenFlags, OptionalExtension, Result as SqliteResult};
use std::path::Path;

use crate::application::errors::error_chain;
use crate::domain::entities::UserRecord;

/// The only schema mutation this crate performs
pub const USER_TABLE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS user_data (
    discord_id INTEGER PRIMARY KEY,
    game_id TEXT,
    game_name TEXT,
    whitelisted BOOLEAN NOT NULL DEFAULT 0,
    security_level INTEGER NOT NULL DEFAULT 0,
    staff_role TEXT,
    event_log TEXT,
    activity TEXT,
    affiliation TEXT
)";

/// Report whether the database file is already on disk
pub fn database_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Make sure `user_data` exists at `path`.
///
/// Never fails outward: store errors are logged and reported as `false`.
/// Creates the database file if needed, but not its parent directory.
pub fn create_database(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match Database::open(path) {
        Ok(_db) => {
            tracing::info!("Database schema ready at {}", path.display());
            true
        }
        Err(e) => {
            tracing::error!(
                "Failed to create database at {}: {}",
                path.display(),
                error_chain(&e)
            );
            false
        }
    }
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> SqliteResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_tables()?;
        Ok(db)
    }

    /// Open a database that is already on disk, read-only.
    ///
    /// Never creates the file and never touches the schema; `None` means there is no file.
    pub fn open_existing(path: impl AsRef<Path>) -> SqliteResult<Option<Self>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(None);
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Some(Self { conn }))
    }

    #[cfg(test)]
    pub fn in_memory() -> SqliteResult<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init_tables()?;
        Ok(db)
    }

    fn init_tables(&self) -> SqliteResult<()> {
        self.conn.execute(USER_TABLE_SCHEMA, [])?;
        Ok(())
    }

    pub fn get_user(&self, discord_id: i64) -> SqliteResult<Option<UserRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT discord_id, game_id, game_name, whitelisted, security_level,
                    staff_role, event_log, activity, affiliation
             FROM user_data WHERE discord_id = ?1",
        )?;

        stmt.query_row([discord_id], |row| {
            Ok(UserRecord {
                discord_id: row.get(0)?,
                game_id: row.get(1)?,
                game_name: row.get(2)?,
                whitelisted: row.get(3)?,
                security_level: row.get(4)?,
                staff_role: row.get(5)?,
                event_log: row.get(6)?,
                activity: row.get(7)?,
                affiliation: row.get(8)?,
            })
        })
        .optional()
    }

    pub fn has_user_table(&self) -> SqliteResult<bool> {
        self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'user_data')",
            [],
            |row| row.get(0),
        )
    }

    /// Column names of `user_data`, in table order
    pub fn columns(&self) -> SqliteResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM pragma_table_info('user_data')")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut columns = Vec::new();
        for column in rows {
            columns.push(column?);
        }
        Ok(columns)
    }

    #[cfg(test)]
    fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: [&str; 9] = [
        "discord_id",
        "game_id",
        "game_name",
        "whitelisted",
        "security_level",
        "staff_role",
        "event_log",
        "activity",
        "affiliation",
    ];

    #[test]
    fn test_create_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");

        assert!(create_database(&path));
        assert!(create_database(&path));

        let db = Database::open(&path).unwrap();
        assert_eq!(db.columns().unwrap(), COLUMNS);
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.db");

        assert!(!database_exists(&path));
        assert!(create_database(&path));
        assert!(database_exists(&path));
    }

    #[test]
    fn test_missing_parent_directory_is_logged_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.db");

        assert!(!create_database(&path));
        assert!(!database_exists(&path));
    }

    #[test]
    fn test_defaults_and_lookup() {
        let db = Database::in_memory().unwrap();
        db.connection()
            .execute(
                "INSERT INTO user_data (discord_id, game_name) VALUES (?1, ?2)",
                rusqlite::params![77_i64, "Scout"],
            )
            .unwrap();

        let user = db.get_user(77).unwrap().expect("row should exist");
        assert_eq!(user.game_name.as_deref(), Some("Scout"));
        assert!(!user.whitelisted);
        assert_eq!(user.security_level, 0);

        assert!(db.get_user(78).unwrap().is_none());
    }

    #[test]
    fn test_existing_rows_survive_reinit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keep.db");
        {
            let db = Database::open(&path).unwrap();
            db.connection()
                .execute("INSERT INTO user_data (discord_id) VALUES (1)", [])
                .unwrap();
        }

        assert!(create_database(&path));
        let db = Database::open(&path).unwrap();
        assert!(db.get_user(1).unwrap().is_some());
    }

    #[test]
    fn test_open_existing_never_creates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");

        assert!(Database::open_existing(&path).unwrap().is_none());
        assert!(!database_exists(&path));
    }

    #[test]
    fn test_open_existing_leaves_schema_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.db");
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute("CREATE TABLE other (id INTEGER)", [])
            .unwrap();

        let db = Database::open_existing(&path).unwrap().unwrap();
        assert!(!db.has_user_table().unwrap());
        assert!(db.columns().unwrap().is_empty());

        assert!(create_database(&path));
        let db = Database::open_existing(&path).unwrap().unwrap();
        assert!(db.has_user_table().unwrap());
    }
}
