//! Seat Model

use serde::{Deserialize, Serialize};

/// Build the canonical seat id from its position (`"<zone>-<index>"`)
pub fn seat_id(zone_id: u32, seat_index: u32) -> String {
    format!("{}-{}", zone_id, seat_index)
}

/// Seat record (座位：归属分区 + 分区内序号 + 使用者)
///
/// An empty `occupant_name` means the seat is vacant. Records are replaced
/// wholesale on every edit, never patched field by field, and there is no
/// delete operation: clearing the name is how a seat is vacated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub id: String,
    pub zone_id: u32,
    pub seat_index: u32,
    pub occupant_name: String,
}

impl SeatRecord {
    /// Create a vacant record for a position
    pub fn vacant(zone_id: u32, seat_index: u32) -> Self {
        Self {
            id: seat_id(zone_id, seat_index),
            zone_id,
            seat_index,
            occupant_name: String::new(),
        }
    }

    /// Create an occupied record for a position
    pub fn occupied(zone_id: u32, seat_index: u32, occupant_name: impl Into<String>) -> Self {
        Self {
            occupant_name: occupant_name.into(),
            ..Self::vacant(zone_id, seat_index)
        }
    }

    /// The id this record belongs under, derived from its own position.
    ///
    /// The stored `id` field is never trusted as a key; see
    /// [`SeatMap::assign`](crate::models::SeatMap::assign).
    pub fn derived_id(&self) -> String {
        seat_id(self.zone_id, self.seat_index)
    }

    pub fn is_occupied(&self) -> bool {
        !self.occupant_name.is_empty()
    }
}
