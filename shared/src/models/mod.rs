//! Data models
//!
//! Shared between perch-server and the board/client crates (via API and bus).
//! Seat ids are strings derived from zone id and seat index (`"<zone>-<index>"`).

pub mod seat;
pub mod seat_map;
pub mod zone;

// Re-exports
pub use seat::*;
pub use seat_map::*;
pub use zone::*;
