//! redb-based storage for the shared seat map
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `seats` | seat id | JSON-serialized `SeatRecord` | The shared seat map |
//! | `meta` | `"plan_version"` | `u64` | Version of the last committed write |
//!
//! Writes are whole-record overwrites keyed by the record's derived id;
//! there is no delete (vacating a seat writes a record with an empty
//! occupant name). The version counter increments once per committed
//! write so broadcasts can be ordered against the store.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::{SeatMap, SeatRecord};
use thiserror::Error;

/// Table for seat records: key = seat id, value = JSON-serialized SeatRecord
const SEATS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("seats");

/// Table for store metadata: key = meta key, value = u64
const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("meta");

const PLAN_VERSION_KEY: &str = "plan_version";

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 座位图存储
#[derive(Debug)]
pub struct SeatStore {
    db: Database,
}

impl SeatStore {
    /// Open (or create) the store at the given path.
    ///
    /// Tables are created up front so later read transactions never see a
    /// missing table.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SEATS_TABLE)?;
            let mut meta = write_txn.open_table(META_TABLE)?;
            if meta.get(PLAN_VERSION_KEY)?.is_none() {
                meta.insert(PLAN_VERSION_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Write one seat record under its derived id, bumping the plan
    /// version in the same transaction. Returns the stored record and the
    /// new version.
    pub fn put(&self, record: &SeatRecord) -> StoreResult<(SeatRecord, u64)> {
        let mut stored = record.clone();
        stored.id = stored.derived_id();
        let bytes = serde_json::to_vec(&stored)?;

        let txn = self.db.begin_write()?;
        let version;
        {
            let mut seats = txn.open_table(SEATS_TABLE)?;
            seats.insert(stored.id.as_str(), bytes.as_slice())?;

            let mut meta = txn.open_table(META_TABLE)?;
            let current = meta.get(PLAN_VERSION_KEY)?.map(|g| g.value()).unwrap_or(0);
            version = current + 1;
            meta.insert(PLAN_VERSION_KEY, version)?;
        }
        txn.commit()?;

        Ok((stored, version))
    }

    /// Read one record by seat id
    pub fn get(&self, id: &str) -> StoreResult<Option<SeatRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEATS_TABLE)?;
        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// The full seat map (empty map if nothing was ever written)
    pub fn snapshot(&self) -> StoreResult<SeatMap> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEATS_TABLE)?;

        let mut map = SeatMap::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let record: SeatRecord = serde_json::from_slice(value.value())?;
            map.assign(record);
        }
        Ok(map)
    }

    /// Version of the last committed write (0 = untouched store)
    pub fn plan_version(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(META_TABLE)?;
        Ok(table.get(PLAN_VERSION_KEY)?.map(|g| g.value()).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SeatStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SeatStore::open(dir.path().join("seats.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn fresh_store_has_empty_snapshot_and_zero_version() {
        let (_dir, store) = temp_store();
        assert!(store.snapshot().unwrap().is_empty());
        assert_eq!(store.plan_version().unwrap(), 0);
    }

    #[test]
    fn put_then_snapshot_round_trips_the_record() {
        let (_dir, store) = temp_store();

        let (stored, version) = store.put(&SeatRecord::occupied(0, 2, "Priya")).unwrap();
        assert_eq!(stored.id, "0-2");
        assert_eq!(version, 1);

        let map = store.snapshot().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("0-2"), Some(&stored));
    }

    #[test]
    fn put_overwrites_and_bumps_version() {
        let (_dir, store) = temp_store();

        store.put(&SeatRecord::occupied(1, 0, "Ana")).unwrap();
        let (_, version) = store.put(&SeatRecord::occupied(1, 0, "Ben")).unwrap();

        assert_eq!(version, 2);
        let map = store.snapshot().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("1-0").unwrap().occupant_name, "Ben");
    }

    #[test]
    fn put_rewrites_a_lying_id_field() {
        let (_dir, store) = temp_store();

        let mut record = SeatRecord::occupied(3, 1, "Noor");
        record.id = "9-9".to_string();
        let (stored, _) = store.put(&record).unwrap();

        assert_eq!(stored.id, "3-1");
        assert!(store.get("9-9").unwrap().is_none());
        assert!(store.get("3-1").unwrap().is_some());
    }

    #[test]
    fn reopening_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seats.redb");

        {
            let store = SeatStore::open(&path).unwrap();
            store.put(&SeatRecord::occupied(5, 3, "Kai")).unwrap();
        }

        let store = SeatStore::open(&path).unwrap();
        assert_eq!(store.plan_version().unwrap(), 1);
        assert_eq!(store.snapshot().unwrap().get("5-3").unwrap().occupant_name, "Kai");
    }
}
