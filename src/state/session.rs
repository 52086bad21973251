/// Session persistence
///
/// The culling session (scored snapshot + remembered threshold) is
/// kept in a small key-value table inside a SQLite database, with
/// JSON-encoded values:
///
/// - `resultsData`    → `{"sharp": [...], "blurry": [...]}`
/// - `savedThreshold` → integer string
/// - `savedAt`        → RFC 3339 timestamp of the last save
///
/// The database file lives in the user's data directory:
/// - Linux: ~/.local/share/photo-cull/session.db
/// - macOS: ~/Library/Application Support/photo-cull/session.db
/// - Windows: %APPDATA%\photo-cull\session.db
///
/// Every read is loose: a missing key, malformed JSON, or a snapshot
/// without both bucket arrays is an error the caller recovers from by
/// substituting the demo snapshot. Storage never halts initialization.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde::Deserialize;

use super::data::{ImageRecord, Partition};
use crate::error::CullError;

pub const KEY_RESULTS: &str = "resultsData";
pub const KEY_THRESHOLD: &str = "savedThreshold";
pub const KEY_SAVED_AT: &str = "savedAt";

/// Threshold used when nothing (or garbage) is remembered.
pub const DEFAULT_THRESHOLD: u8 = 50;

/// Storage seam for the result store and the app shell.
///
/// Injected rather than reached for globally, so the store is
/// testable without a database on disk.
pub trait SessionStorage {
    /// Load and validate the stored snapshot.
    fn load_results(&self) -> Result<Partition, CullError>;

    /// Persist the snapshot (stamps `savedAt` as a side effect).
    fn save_results(&self, results: &Partition) -> Result<(), CullError>;

    /// Remembered threshold, if a valid one is stored.
    fn load_threshold(&self) -> Option<u8>;

    fn save_threshold(&self, threshold: u8) -> Result<(), CullError>;
}

/// Loose decode shape: tolerates absent buckets so we can report
/// `InvalidData` instead of a generic parse error, and ignores
/// unknown fields from older sessions.
#[derive(Deserialize)]
struct StoredResults {
    #[serde(default)]
    sharp: Option<Vec<ImageRecord>>,
    #[serde(default)]
    blurry: Option<Vec<ImageRecord>>,
}

fn decode_results(json: &str) -> Result<Partition, CullError> {
    let stored: StoredResults = serde_json::from_str(json)?;

    match (stored.sharp, stored.blurry) {
        (Some(sharp), Some(blurry)) => Ok(Partition { sharp, blurry }),
        _ => Err(CullError::InvalidData),
    }
}

/// SQLite-backed session storage.
pub struct SqliteSession {
    conn: Connection,
}

impl SqliteSession {
    /// Open (or create) the session database in the user's data
    /// directory and make sure the schema exists.
    pub fn new() -> Result<Self, CullError> {
        let db_path = Self::db_path();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        println!("📁 Session database at: {}", db_path.display());

        let session = SqliteSession { conn };
        session.init_schema()?;
        Ok(session)
    }

    /// Purely in-memory database, for tests.
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, CullError> {
        let session = SqliteSession {
            conn: Connection::open_in_memory()?,
        };
        session.init_schema()?;
        Ok(session)
    }

    fn db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("photo-cull");
        path.push("session.db");
        path
    }

    /// Create the key-value table if it does not exist. Safe to run
    /// on every open.
    fn init_schema(&self) -> Result<(), CullError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, CullError> {
        let value = self
            .conn
            .query_row("SELECT value FROM session WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CullError> {
        self.conn.execute(
            "INSERT INTO session (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }
}

impl SessionStorage for SqliteSession {
    fn load_results(&self) -> Result<Partition, CullError> {
        match self.get(KEY_RESULTS)? {
            Some(json) => decode_results(&json),
            None => Err(CullError::InvalidData),
        }
    }

    fn save_results(&self, results: &Partition) -> Result<(), CullError> {
        let json = serde_json::to_string(results)?;
        self.set(KEY_RESULTS, &json)?;
        self.set(KEY_SAVED_AT, &Utc::now().to_rfc3339())?;
        Ok(())
    }

    fn load_threshold(&self) -> Option<u8> {
        let value = self.get(KEY_THRESHOLD).ok()??;
        value.trim().parse().ok().filter(|t| *t <= 100)
    }

    fn save_threshold(&self, threshold: u8) -> Result<(), CullError> {
        self.set(KEY_THRESHOLD, &threshold.to_string())
    }
}

/// In-memory session storage.
///
/// Backs tests, and keeps the app usable when the on-disk database
/// cannot be opened (nothing survives the process in that case).
#[derive(Default)]
pub struct MemorySession {
    values: RefCell<HashMap<String, String>>,
}

impl SessionStorage for MemorySession {
    fn load_results(&self) -> Result<Partition, CullError> {
        match self.values.borrow().get(KEY_RESULTS) {
            Some(json) => decode_results(json),
            None => Err(CullError::InvalidData),
        }
    }

    fn save_results(&self, results: &Partition) -> Result<(), CullError> {
        let json = serde_json::to_string(results)?;
        let mut values = self.values.borrow_mut();
        values.insert(KEY_RESULTS.to_string(), json);
        values.insert(KEY_SAVED_AT.to_string(), Utc::now().to_rfc3339());
        Ok(())
    }

    fn load_threshold(&self) -> Option<u8> {
        let values = self.values.borrow();
        let value = values.get(KEY_THRESHOLD)?;
        value.trim().parse().ok().filter(|t| *t <= 100)
    }

    fn save_threshold(&self, threshold: u8) -> Result<(), CullError> {
        self.values
            .borrow_mut()
            .insert(KEY_THRESHOLD.to_string(), threshold.to_string());
        Ok(())
    }
}

impl MemorySession {
    /// Seed a raw value, bypassing validation (tests exercise the
    /// malformed-data paths through this).
    #[cfg(test)]
    pub fn seed(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Built-in demo snapshot, used whenever stored results are absent or
/// unusable. Keeps the results screen functional before any upload.
pub fn demo_results() -> Partition {
    let sharp = [
        ("https://images.unsplash.com/photo-1500530855697-b586d89ba3ee", 91),
        ("https://images.unsplash.com/photo-1501785888041-af3ef285b470", 84),
        ("https://images.unsplash.com/photo-1470770903676-69b98201ea1c", 77),
    ];
    let blurry = [
        ("https://images.unsplash.com/photo-1441974231531-c6227db76b6e", 38),
        ("https://images.unsplash.com/photo-1445820200644-69f87d946277", 22),
    ];

    Partition {
        sharp: sharp
            .iter()
            .enumerate()
            .map(|(i, (src, score))| ImageRecord::new(*src, format!("Sharp_{}.jpg", i + 1), *score))
            .collect(),
        blurry: blurry
            .iter()
            .enumerate()
            .map(|(i, (src, score))| ImageRecord::new(*src, format!("Blurry_{}.jpg", i + 1), *score))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Label;

    #[test]
    fn test_sqlite_round_trip_preserves_annotations() {
        let session = SqliteSession::in_memory().unwrap();

        let mut results = demo_results();
        results.sharp[0].rating = 4;
        results.sharp[0].label = Label::Green;

        session.save_results(&results).unwrap();
        let restored = session.load_results().unwrap();
        assert_eq!(restored, results);

        session.save_threshold(63).unwrap();
        assert_eq!(session.load_threshold(), Some(63));
    }

    #[test]
    fn test_missing_results_is_an_error_not_a_panic() {
        let session = SqliteSession::in_memory().unwrap();
        assert!(session.load_results().is_err());
        assert_eq!(session.load_threshold(), None);
    }

    #[test]
    fn test_malformed_json_degrades_to_error() {
        let session = MemorySession::default();
        session.seed(KEY_RESULTS, "{not json at all");
        assert!(matches!(
            session.load_results(),
            Err(CullError::Encoding(_))
        ));
    }

    #[test]
    fn test_snapshot_without_both_buckets_is_invalid_data() {
        let session = MemorySession::default();
        session.seed(KEY_RESULTS, r#"{"sharp": []}"#);
        assert!(matches!(
            session.load_results(),
            Err(CullError::InvalidData)
        ));
    }

    #[test]
    fn test_garbage_threshold_is_ignored() {
        let session = MemorySession::default();
        session.seed(KEY_THRESHOLD, "not-a-number");
        assert_eq!(session.load_threshold(), None);

        session.seed(KEY_THRESHOLD, "250");
        assert_eq!(session.load_threshold(), None);

        session.seed(KEY_THRESHOLD, "42");
        assert_eq!(session.load_threshold(), Some(42));
    }

    #[test]
    fn test_demo_results_have_unique_sources() {
        let demo = demo_results();
        assert!(!demo.sharp.is_empty());
        assert!(!demo.blurry.is_empty());

        let mut srcs: Vec<&str> = demo.iter_all().map(|img| img.src.as_str()).collect();
        srcs.sort_unstable();
        srcs.dedup();
        assert_eq!(srcs.len(), demo.len());
    }
}
