use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use super::data::FeedbackMessage;

/// Errors from the guest book store
#[derive(Debug, thiserror::Error)]
pub enum GuestBookError {
    /// Validation at the store boundary: a message must have content
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("could not create the application data directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("guest book database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// The GuestBook manages the SQLite store behind the feedback form.
/// It holds the `users` and `feedbacks` relations; the application
/// only ever touches `feedbacks`.
pub struct GuestBook {
    conn: Connection,
    db_path: PathBuf,
}

impl GuestBook {
    /// Open the guest book in the user's data directory, creating the
    /// database and its schema on first run.
    ///
    /// - Linux: ~/.local/share/birthday-card/guest_book.db
    /// - macOS: ~/Library/Application Support/birthday-card/guest_book.db
    /// - Windows: %APPDATA%\birthday-card\guest_book.db
    pub fn new() -> Result<Self, GuestBookError> {
        Self::open_at(Self::default_db_path())
    }

    /// Open (or create) the guest book at an explicit path.
    ///
    /// Background tasks use this to get their own connection;
    /// `rusqlite::Connection` is not Send, so the main connection
    /// cannot be shared with them.
    pub fn open_at(db_path: impl Into<PathBuf>) -> Result<Self, GuestBookError> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        let book = GuestBook { conn, db_path };
        book.init_schema()?;

        Ok(book)
    }

    /// In-memory guest book for tests
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, GuestBookError> {
        let conn = Connection::open_in_memory()?;
        let book = GuestBook {
            conn,
            db_path: PathBuf::from(":memory:"),
        };
        book.init_schema()?;
        Ok(book)
    }

    /// Where the database lives by default
    pub fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("birthday-card");
        path.push("guest_book.db");
        path
    }

    /// Initialize the database schema.
    /// Creates both tables and the listing index if they don't exist.
    fn init_schema(&self) -> Result<(), GuestBookError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
            )",
            [],
        )?;

        // Guest book messages; created_at is a UTC unix timestamp
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS feedbacks (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                message    TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_feedbacks_created_at
             ON feedbacks(created_at DESC)",
            [],
        )?;

        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Persist a message and return the stored record with its
    /// assigned id and timestamp. The text is trimmed before storage;
    /// blank messages are rejected without touching the database.
    pub fn create_feedback(&self, message: &str) -> Result<FeedbackMessage, GuestBookError> {
        let text = message.trim();
        if text.is_empty() {
            return Err(GuestBookError::EmptyMessage);
        }

        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO feedbacks (message, created_at) VALUES (?1, ?2)",
            rusqlite::params![text, created_at.timestamp()],
        )?;

        Ok(FeedbackMessage {
            id: self.conn.last_insert_rowid(),
            message: text.to_owned(),
            // Round-trip through seconds so the returned record matches
            // what a later listing will read back.
            created_at: DateTime::from_timestamp(created_at.timestamp(), 0)
                .unwrap_or(created_at),
        })
    }

    /// All messages, newest first. The id tie-break keeps same-second
    /// inserts in reverse insertion order.
    pub fn all_feedbacks(&self) -> Result<Vec<FeedbackMessage>, GuestBookError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, message, created_at FROM feedbacks
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(FeedbackMessage {
                id: row.get(0)?,
                message: row.get(1)?,
                created_at: DateTime::from_timestamp(row.get(2)?, 0).unwrap_or_default(),
            })
        })?;

        let mut messages = Vec::new();
        for message in rows {
            messages.push(message?);
        }

        Ok(messages)
    }

    /// Get a count of messages in the guest book
    pub fn feedback_count(&self) -> Result<i64, GuestBookError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM feedbacks", [], |row| row.get(0))?;
        Ok(count)
    }
}

// Implement Debug by hand; Connection is not Debug-friendly
impl std::fmt::Debug for GuestBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuestBook")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_id_and_timestamp() {
        let book = GuestBook::open_in_memory().unwrap();

        let before = Utc::now().timestamp();
        let saved = book.create_feedback("Happy birthday!").unwrap();

        assert!(saved.id > 0);
        assert_eq!(saved.message, "Happy birthday!");
        assert!(saved.created_at.timestamp() >= before);
    }

    #[test]
    fn test_create_trims_whitespace() {
        let book = GuestBook::open_in_memory().unwrap();
        let saved = book.create_feedback("  so sweet!  \n").unwrap();
        assert_eq!(saved.message, "so sweet!");
    }

    #[test]
    fn test_blank_message_is_rejected() {
        let book = GuestBook::open_in_memory().unwrap();

        assert!(matches!(
            book.create_feedback(""),
            Err(GuestBookError::EmptyMessage)
        ));
        assert!(matches!(
            book.create_feedback("   \t\n"),
            Err(GuestBookError::EmptyMessage)
        ));
        assert_eq!(book.feedback_count().unwrap(), 0);
    }

    #[test]
    fn test_listing_is_newest_first() {
        let book = GuestBook::open_in_memory().unwrap();

        let a = book.create_feedback("A").unwrap();
        let b = book.create_feedback("B").unwrap();
        let c = book.create_feedback("C").unwrap();

        let all = book.all_feedbacks().unwrap();
        assert_eq!(
            all.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![c.id, b.id, a.id]
        );
        assert_eq!(
            all.iter().map(|m| m.message.as_str()).collect::<Vec<_>>(),
            vec!["C", "B", "A"]
        );
    }

    #[test]
    fn test_empty_guest_book_lists_nothing() {
        let book = GuestBook::open_in_memory().unwrap();
        assert!(book.all_feedbacks().unwrap().is_empty());
    }

    #[test]
    fn test_listing_round_trips_the_created_record() {
        let book = GuestBook::open_in_memory().unwrap();
        let saved = book.create_feedback("round trip").unwrap();
        let listed = book.all_feedbacks().unwrap();
        assert_eq!(listed, vec![saved]);
    }

    #[test]
    fn test_reopening_keeps_messages() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("guest_book.db");

        {
            let book = GuestBook::open_at(&db_path).unwrap();
            book.create_feedback("persisted").unwrap();
        }

        let book = GuestBook::open_at(&db_path).unwrap();
        assert_eq!(book.feedback_count().unwrap(), 1);
        assert_eq!(book.all_feedbacks().unwrap()[0].message, "persisted");
    }
}
