//! Local fallback store
//!
//! A device-local redb database with a single slot holding the last
//! known seat map. Read once at startup when no share link was given;
//! overwritten after every change. Best-effort by design: every failure
//! on the load path reads as "no cache", and save errors are logged and
//! dropped. Last write wins, no versioning.

use std::path::PathBuf;

use redb::{Database, ReadableDatabase, TableDefinition};
use shared::models::SeatMap;

/// Single-slot table: key = slot name, value = JSON-serialized SeatMap
const CACHE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("seat_map");

const SLOT_KEY: &str = "office_seats";

/// 本地座位图缓存
#[derive(Debug, Clone)]
pub struct SeatCache {
    path: PathBuf,
}

impl SeatCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the cached map, or `None` if there is no usable cache.
    ///
    /// Missing file, unreadable database, and corrupt payload all land in
    /// the same `None`; the caller falls through to an empty map.
    pub fn load(&self) -> Option<SeatMap> {
        if !self.path.exists() {
            return None;
        }
        match self.try_load() {
            Ok(map) => map,
            Err(e) => {
                tracing::debug!("Seat cache unreadable, treating as absent: {}", e);
                None
            }
        }
    }

    /// Overwrite the cache with the full current map (fire and forget)
    pub fn save(&self, map: &SeatMap) {
        if let Err(e) = self.try_save(map) {
            tracing::debug!("Seat cache write failed: {}", e);
        }
    }

    fn try_load(&self) -> Result<Option<SeatMap>, Box<dyn std::error::Error>> {
        let db = Database::open(&self.path)?;
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(CACHE_TABLE)?;
        match table.get(SLOT_KEY)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    fn try_save(&self, map: &SeatMap) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(map)?;

        let db = Database::create(&self.path)?;
        let txn = db.begin_write()?;
        {
            let mut table = txn.open_table(CACHE_TABLE)?;
            table.insert(SLOT_KEY, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::SeatRecord;

    #[test]
    fn missing_cache_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SeatCache::new(dir.path().join("nope.redb"));
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SeatCache::new(dir.path().join("seats-cache.redb"));

        let map: SeatMap = [SeatRecord::occupied(0, 2, "Priya")].into_iter().collect();
        cache.save(&map);
        assert_eq!(cache.load(), Some(map));
    }

    #[test]
    fn corrupt_cache_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seats-cache.redb");
        std::fs::write(&path, b"this is not a redb database").unwrap();

        let cache = SeatCache::new(&path);
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn save_is_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SeatCache::new(dir.path().join("seats-cache.redb"));

        let first: SeatMap = [SeatRecord::occupied(0, 0, "Ana")].into_iter().collect();
        let second: SeatMap = [SeatRecord::occupied(1, 1, "Ben")].into_iter().collect();
        cache.save(&first);
        cache.save(&second);
        assert_eq!(cache.load(), Some(second));
    }
}
