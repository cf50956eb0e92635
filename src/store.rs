use crate::error::StoreError;
use chrono::{Local, NaiveDateTime, Timelike};
use rusqlite::{params, types::Type, Connection};
use std::path::Path;

/// Text layout of the `date` column (local time, second precision)
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted BMI observation. Immutable once written.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Insertion-order key assigned by the store
    pub id: i64,
    pub name: String,
    pub bmi: f64,
    pub recorded_at: NaiveDateTime,
}

impl Record {
    pub fn date_string(&self) -> String {
        self.recorded_at.format(DATE_FORMAT).to_string()
    }
}

/// Append-only record log consumed by the session.
///
/// Implementations must return `recent` newest-first by insertion order and
/// must never fail `recent` just because nothing has been written yet.
pub trait RecordStore {
    /// Create the table if absent. Safe to call on every start.
    fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Persist one record, assigning its id and timestamp
    fn append(&mut self, name: &str, bmi: f64) -> Result<Record, StoreError>;

    /// At most `limit` records, newest first
    fn recent(&self, limit: u32) -> Result<Vec<Record>, StoreError>;
}

// ============================================================================
// SQLITE BACKEND
// ============================================================================

/// Record store backed by a single SQLite connection.
///
/// The connection is opened once and closed when the store is dropped.
pub struct SqliteStore {
    conn: Connection,
    last_recorded: Option<NaiveDateTime>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(StoreError::Open)?;

        // WAL for crash recovery. This is also the first statement that
        // touches the file, so unreadable or foreign files fail here.
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(StoreError::Open)?;

        tracing::info!(path = %path.display(), journal_mode = %mode, "opened record store");
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Open)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            last_recorded: None,
        }
    }

    /// Current local time truncated to whole seconds, never earlier than the
    /// previous insert from this process
    fn next_timestamp(&mut self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        let now = now.with_nanosecond(0).unwrap_or(now);

        let stamp = match self.last_recorded {
            Some(last) if now < last => last,
            _ => now,
        };
        self.last_recorded = Some(stamp);
        stamp
    }

    #[cfg(test)]
    pub fn count(&self) -> Result<i64, StoreError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM bmi_records", [], |row| row.get(0))
            .map_err(StoreError::Query)
    }
}

impl RecordStore for SqliteStore {
    fn ensure_schema(&self) -> Result<(), StoreError> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS bmi_records (
                    id INTEGER PRIMARY KEY,
                    name TEXT,
                    metric REAL,
                    date TEXT
                )",
                [],
            )
            .map_err(StoreError::SchemaInit)?;

        tracing::debug!("schema ready");
        Ok(())
    }

    fn append(&mut self, name: &str, bmi: f64) -> Result<Record, StoreError> {
        let recorded_at = self.next_timestamp();

        self.conn
            .execute(
                "INSERT INTO bmi_records (name, metric, date) VALUES (?1, ?2, ?3)",
                params![name, bmi, recorded_at.format(DATE_FORMAT).to_string()],
            )
            .map_err(StoreError::Write)?;

        let record = Record {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            bmi,
            recorded_at,
        };

        tracing::info!(id = record.id, bmi = record.bmi, "record appended");
        Ok(record)
    }

    fn recent(&self, limit: u32) -> Result<Vec<Record>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, metric, date
                 FROM bmi_records
                 ORDER BY id DESC
                 LIMIT ?1",
            )
            .map_err(StoreError::Query)?;

        let records = stmt
            .query_map(params![limit], |row| {
                let date: String = row.get(3)?;
                let recorded_at = NaiveDateTime::parse_from_str(&date, DATE_FORMAT)
                    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

                Ok(Record {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    bmi: row.get(2)?,
                    recorded_at,
                })
            })
            .map_err(StoreError::Query)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::Query)?;

        tracing::debug!(limit, returned = records.len(), "history queried");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store
    }

    #[test]
    fn test_recent_on_empty_store() {
        let store = memory_store();
        let records = store.recent(10).unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn test_append_then_recent_round_trip() {
        let mut store = memory_store();
        let written = store.append("Alice", 22.491349480968857).unwrap();

        let records = store.recent(1).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Alice");
        assert_eq!(records[0].bmi, 22.491349480968857);
        assert_eq!(records[0].id, written.id);
        assert_eq!(records[0].recorded_at, written.recorded_at);
    }

    #[test]
    fn test_recent_limits_and_orders_newest_first() {
        let mut store = memory_store();
        for i in 0..15 {
            store.append(&format!("person-{i}"), 20.0 + i as f64).unwrap();
        }

        let records = store.recent(10).unwrap();

        assert_eq!(records.len(), 10);
        assert_eq!(records[0].name, "person-14");
        assert_eq!(records[9].name, "person-5");
        for pair in records.windows(2) {
            assert!(pair[0].id > pair[1].id, "ids must strictly decrease");
            assert!(pair[0].recorded_at >= pair[1].recorded_at);
        }
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let mut store = memory_store();
        store.append("Bob", 24.0).unwrap();

        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();

        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_timestamp_text_layout() {
        let mut store = memory_store();
        let record = store.append("Carol", 19.0).unwrap();

        let text: String = store
            .conn
            .query_row("SELECT date FROM bmi_records WHERE id = ?1", [record.id], |row| row.get(0))
            .unwrap();

        assert_eq!(text, record.date_string());
        assert_eq!(text.len(), "2024-01-01 00:00:00".len());
        assert_eq!(record.recorded_at.nanosecond(), 0);
    }

    #[test]
    fn test_timestamps_never_go_backwards() {
        let mut store = memory_store();
        let future = Local::now().naive_local().with_nanosecond(0).unwrap() + chrono::Duration::hours(1);
        store.last_recorded = Some(future);

        let record = store.append("Dave", 21.0).unwrap();

        assert_eq!(record.recorded_at, future);
    }

    #[test]
    fn test_names_are_bound_not_interpolated() {
        let mut store = memory_store();
        store.append("O'Brien'); DROP TABLE bmi_records; --", 23.0).unwrap();

        let records = store.recent(5).unwrap();
        assert_eq!(records[0].name, "O'Brien'); DROP TABLE bmi_records; --");
    }

    #[test]
    fn test_append_without_schema_is_write_error() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        let err = store.append("Eve", 20.0).unwrap_err();

        assert!(matches!(err, StoreError::Write(_)));
        assert!(err.to_string().starts_with("Failed to insert record"));
    }

    #[test]
    fn test_recent_without_schema_is_query_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(store.recent(10), Err(StoreError::Query(_))));
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bmi_history.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.ensure_schema().unwrap();
            store.append("Frank", 26.5).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        store.ensure_schema().unwrap();
        let records = store.recent(10).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Frank");
        assert_eq!(records[0].bmi, 26.5);
    }

    #[test]
    fn test_open_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("bmi_history.db");

        let result = SqliteStore::open(&path);

        assert!(matches!(result, Err(StoreError::Open(_))));
    }
}
