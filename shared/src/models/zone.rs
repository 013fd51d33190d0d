//! Zone Model

use serde::{Deserialize, Serialize};

/// Seats per zone (每组 4 席，6 组共 24 席)
pub const SEATS_PER_ZONE: u32 = 4;

/// Zone entity (分区：开放办公区的一组桌位)
///
/// The floor plan is fixed at compile time; zones are not persisted and
/// not user-editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneData {
    pub id: u32,
    pub row: u32,
    pub col: u32,
}

/// The staff-area floor plan: two columns of three zones each.
pub const FLOOR_ZONES: [ZoneData; 6] = [
    // Left column
    ZoneData { id: 0, row: 0, col: 0 },
    ZoneData { id: 1, row: 1, col: 0 },
    ZoneData { id: 2, row: 2, col: 0 },
    // Right column
    ZoneData { id: 3, row: 0, col: 1 },
    ZoneData { id: 4, row: 1, col: 1 },
    ZoneData { id: 5, row: 2, col: 1 },
];

/// Look up a zone by id
pub fn zone_by_id(id: u32) -> Option<&'static ZoneData> {
    FLOOR_ZONES.iter().find(|z| z.id == id)
}

/// Whether a (zone, index) pair names a seat on the floor plan
pub fn position_exists(zone_id: u32, seat_index: u32) -> bool {
    zone_by_id(zone_id).is_some() && seat_index < SEATS_PER_ZONE
}
