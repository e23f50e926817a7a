//! Use cases behind each API area.
//!
//! Each struct wraps the ports it needs and exposes the operations the HTTP
//! layer calls.

pub mod campaign;
pub mod entity;
pub mod folder_tree;
pub mod maps;
pub mod scene;
pub mod sidebar;
pub mod upload;

pub use campaign::{CampaignError, CampaignOps};
pub use entity::{EntityError, EntityOps};
pub use folder_tree::{FolderTree, FolderTreeError};
pub use maps::{MapError, MapOps};
pub use scene::{SceneError, SceneOps};
pub use sidebar::{SidebarError, SidebarOps};
pub use upload::{UploadError, UploadOps};
