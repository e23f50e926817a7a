//! Tablekeep domain types and invariants.
//!
//! Everything in this crate is pure: the campaign documents themselves,
//! the flat folder cache mirrored from the remote store, tree
//! reconstruction, and the derived NPC/faction indexes. I/O lives in the
//! engine crate.

pub mod entities;
pub mod error;
pub mod ids;
pub mod tree;

pub use entities::{
    CampaignNode, CampaignState, Elements, EntityMetadata, FactionIndex, FolderCache, FolderEntry,
    FolderNode, IndexEntry, NpcIndex, SceneState, ShortcutEntry,
};
pub use error::DomainError;
pub use ids::FileId;
