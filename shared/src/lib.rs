//! Shared types for the Perch seating board
//!
//! Common types used across the server, client, and board crates:
//! seat/zone data models, the share-link state codec, and the message
//! bus wire types.

pub mod link;
pub mod message;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Message bus re-exports (for convenient access)
pub use message::{BusMessage, EventType};

// Model re-exports
pub use models::{SeatMap, SeatRecord, ZoneData};
