//! Request payloads, one module per API area.

mod entity;
mod folder;
mod map;

pub use entity::SaveEntityRequest;
pub use folder::{CreateFolderRequest, SaveShortcutRequest, VisitFolderRequest};
pub use map::{ImportMapRequest, SaveMapRequest};
