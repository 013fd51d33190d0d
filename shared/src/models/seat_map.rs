//! Seat Map
//!
//! The full assignment state: one record per seat that has ever been
//! edited. This is the single structure every store (in-memory, share
//! link, local cache, seat server) reads and writes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::seat::SeatRecord;
use super::seat::seat_id;

/// Mapping from seat id to seat record
///
/// Invariant: every key equals the `derived_id()` of its record. The map
/// enforces this itself: [`assign`](Self::assign) is the only mutation
/// point and it constructs the key from the record's own position,
/// rewriting a lying `id` field rather than trusting it.
///
/// A `BTreeMap` keeps encoding deterministic, which keeps share links for
/// the same state byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatMap(BTreeMap<String, SeatRecord>);

impl SeatMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, id: &str) -> Option<&SeatRecord> {
        self.0.get(id)
    }

    /// The record at a position, or a fresh vacant record if the seat has
    /// never been edited. This is what a click on a seat starts from.
    pub fn get_or_vacant(&self, zone_id: u32, seat_index: u32) -> SeatRecord {
        self.0
            .get(&seat_id(zone_id, seat_index))
            .cloned()
            .unwrap_or_else(|| SeatRecord::vacant(zone_id, seat_index))
    }

    /// Merge one record into the map, replacing any prior entry.
    ///
    /// The storage key (and the record's `id` field) are derived from the
    /// record's `zone_id`/`seat_index`. Returns the id the record was
    /// stored under.
    pub fn assign(&mut self, mut record: SeatRecord) -> String {
        let id = record.derived_id();
        record.id = id.clone();
        self.0.insert(id.clone(), record);
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SeatRecord)> {
        self.0.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &SeatRecord> {
        self.0.values()
    }

    /// Number of seats with a non-empty occupant name
    pub fn occupied_count(&self) -> usize {
        self.0.values().filter(|r| r.is_occupied()).count()
    }
}

impl FromIterator<SeatRecord> for SeatMap {
    fn from_iter<I: IntoIterator<Item = SeatRecord>>(iter: I) -> Self {
        let mut map = Self::new();
        for record in iter {
            map.assign(record);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_on_untouched_seat_synthesizes_vacant_record() {
        let map = SeatMap::new();
        let record = map.get_or_vacant(2, 1);
        assert_eq!(record.id, "2-1");
        assert_eq!(record.zone_id, 2);
        assert_eq!(record.seat_index, 1);
        assert_eq!(record.occupant_name, "");
    }

    #[test]
    fn assign_updates_only_its_own_key() {
        let mut map = SeatMap::new();
        map.assign(SeatRecord::occupied(0, 0, "Ana"));
        map.assign(SeatRecord::occupied(2, 1, "Alex"));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("0-0").unwrap().occupant_name, "Ana");
        assert_eq!(map.get("2-1").unwrap().occupant_name, "Alex");

        // Replacing one entry leaves the other untouched
        map.assign(SeatRecord::occupied(2, 1, "Ben"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("0-0").unwrap().occupant_name, "Ana");
        assert_eq!(map.get("2-1").unwrap().occupant_name, "Ben");
    }

    #[test]
    fn assign_derives_key_from_position_not_from_id_field() {
        let mut map = SeatMap::new();
        let mut record = SeatRecord::occupied(3, 2, "Priya");
        record.id = "totally-wrong".to_string();

        let id = map.assign(record);
        assert_eq!(id, "3-2");
        assert!(map.get("totally-wrong").is_none());
        assert_eq!(map.get("3-2").unwrap().id, "3-2");
    }

    #[test]
    fn clearing_the_name_keeps_the_record() {
        let mut map = SeatMap::new();
        map.assign(SeatRecord::occupied(1, 0, "Ana"));
        map.assign(SeatRecord::vacant(1, 0));

        let record = map.get("1-0").unwrap();
        assert!(!record.is_occupied());
        assert_eq!(map.len(), 1);
        assert_eq!(map.occupied_count(), 0);
    }
}
