use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result as SqlResult};
use std::path::{Path, PathBuf};

use super::data::Photo;

/// The Library manages the SQLite picture database.
/// It stores every captured picture as a named JPEG blob.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

impl Library {
    /// Create a new Library instance and initialize the database.
    ///
    /// The database file is created in the user's data directory:
    /// - Linux: ~/.local/share/photobooth/photobooth.db
    /// - macOS: ~/Library/Application Support/photobooth/photobooth.db
    /// - Windows: %APPDATA%\photobooth\photobooth.db
    pub fn new() -> SqlResult<Self> {
        Self::open(&Self::default_db_path())
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// Background tasks use this to get their own connection from the stored
    /// path, since rusqlite connections are not Send.
    pub fn open(db_path: &Path) -> SqlResult<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .expect("Failed to create application data directory");
            }
        }

        let conn = Connection::open(db_path)?;

        let library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;

        Ok(library)
    }

    /// Open a throwaway in-memory database. Used by tests.
    #[cfg(test)]
    pub fn open_in_memory() -> SqlResult<Self> {
        let library = Library {
            conn: Connection::open_in_memory()?,
            db_path: PathBuf::from(":memory:"),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Get the path where the database should be stored
    pub fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user data directory");

        path.push("photobooth");
        path.push("photobooth.db");
        path
    }

    /// Initialize the database schema.
    /// Safe to invoke on every startup; existing rows are untouched.
    fn init_schema(&self) -> SqlResult<()> {
        // The CHECK constraints back up the validation at the operation
        // boundary: the store must never hold an empty name or empty payload.
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS pictures (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL CHECK(length(name) > 0),
                data            BLOB NOT NULL CHECK(length(data) > 0),
                captured_at     INTEGER NOT NULL
            )",
            [],
        )?;

        // Index for the name-driven lookups and deletes
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_pictures_name
             ON pictures(name)",
            [],
        )?;

        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Get a count of pictures in the library
    pub fn picture_count(&self) -> SqlResult<i64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM pictures", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert a new picture and return its ID.
    /// Duplicate names are allowed and never fail.
    pub fn insert(&self, name: &str, data: &[u8]) -> SqlResult<i64> {
        self.conn.execute(
            "INSERT INTO pictures (name, data, captured_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![name, data, Utc::now().timestamp()],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Find the first picture with the given name, or None.
    ///
    /// "First" means lowest id, the oldest picture with that name. With
    /// duplicate names this is an accepted ambiguity, not an error.
    pub fn find_first_by_name(&self, name: &str) -> SqlResult<Option<Photo>> {
        self.conn
            .query_row(
                "SELECT id, name, data, captured_at FROM pictures
                 WHERE name = ?1 ORDER BY id LIMIT 1",
                [name],
                |row| {
                    Ok(Photo {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        data: row.get(2)?,
                        captured_at: row.get(3)?,
                    })
                },
            )
            .optional()
    }

    /// Get every picture in the library, oldest first (id ascending).
    pub fn list_all(&self) -> SqlResult<Vec<Photo>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, data, captured_at FROM pictures ORDER BY id ASC",
        )?;

        let photo_iter = stmt.query_map([], |row| {
            Ok(Photo {
                id: row.get(0)?,
                name: row.get(1)?,
                data: row.get(2)?,
                captured_at: row.get(3)?,
            })
        })?;

        let mut photos = Vec::new();
        for photo in photo_iter {
            photos.push(photo?);
        }

        Ok(photos)
    }

    /// Delete every picture with the given name.
    /// Returns how many rows were removed; 0 is a normal result, not an error.
    pub fn delete_by_name(&self, name: &str) -> SqlResult<usize> {
        self.conn
            .execute("DELETE FROM pictures WHERE name = ?1", [name])
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_find() {
        let library = Library::open_in_memory().unwrap();

        let id = library.insert("cat", b"payload-1").unwrap();
        let found = library.find_first_by_name("cat").unwrap().unwrap();

        assert_eq!(found.id, id);
        assert_eq!(found.name, "cat");
        assert_eq!(found.data, b"payload-1");
    }

    #[test]
    fn test_find_miss_is_none() {
        let library = Library::open_in_memory().unwrap();
        assert!(library.find_first_by_name("ghost").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_names_keep_both_in_insertion_order() {
        let library = Library::open_in_memory().unwrap();

        let first = library.insert("dup", b"payload-1").unwrap();
        let second = library.insert("dup", b"payload-2").unwrap();
        assert!(second > first);

        let all = library.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].data, b"payload-1");
        assert_eq!(all[1].data, b"payload-2");

        // First match is the lowest id
        let found = library.find_first_by_name("dup").unwrap().unwrap();
        assert_eq!(found.id, first);
    }

    #[test]
    fn test_delete_removes_all_matches() {
        let library = Library::open_in_memory().unwrap();

        library.insert("dup", b"payload-1").unwrap();
        library.insert("dup", b"payload-2").unwrap();
        library.insert("other", b"payload-3").unwrap();

        assert_eq!(library.delete_by_name("dup").unwrap(), 2);
        assert_eq!(library.picture_count().unwrap(), 1);
    }

    #[test]
    fn test_delete_miss_returns_zero() {
        let library = Library::open_in_memory().unwrap();
        library.insert("kept", b"payload").unwrap();

        assert_eq!(library.delete_by_name("ghost").unwrap(), 0);
        assert_eq!(library.picture_count().unwrap(), 1);
    }

    #[test]
    fn test_empty_name_or_payload_rejected_by_schema() {
        let library = Library::open_in_memory().unwrap();

        assert!(library.insert("", b"payload").is_err());
        assert!(library.insert("name", b"").is_err());
        assert_eq!(library.picture_count().unwrap(), 0);
    }

    #[test]
    fn test_schema_init_is_idempotent_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("photobooth.db");

        let id = {
            let library = Library::open(&db_path).unwrap();
            library.insert("persists", b"payload").unwrap()
        };

        // Reopening re-runs init_schema against the same file
        let reopened = Library::open(&db_path).unwrap();
        assert_eq!(reopened.picture_count().unwrap(), 1);

        let found = reopened.find_first_by_name("persists").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.data, b"payload");
    }

    #[test]
    fn test_ids_are_never_reused_after_delete() {
        let library = Library::open_in_memory().unwrap();

        let first = library.insert("gone", b"payload").unwrap();
        library.delete_by_name("gone").unwrap();
        let second = library.insert("next", b"payload").unwrap();

        assert!(second > first);
    }
}
