//! Campaign document types.
//!
//! One module per persisted document kind. These are the explicit record
//! types every load boundary validates into.

pub mod campaign;
pub mod folder;
pub mod index;
pub mod metadata;
pub mod scene;

pub use campaign::{CampaignNode, CampaignState};
pub use folder::{FolderCache, FolderEntry, FolderNode};
pub use index::{FactionIndex, IndexEntry, NpcIndex, ShortcutEntry};
pub use metadata::{Elements, EntityMetadata};
pub use scene::SceneState;
