//! In-memory state storage modules.
//!
//! Stores manage runtime state that doesn't belong on disk:
//! - `MapSyncStore` - the map snapshot shared between admin and guests

pub mod map_sync;

pub use map_sync::{MapSnapshot, MapSyncStore};
