//! Tablekeep shared contracts.
//!
//! Request and response DTOs for the engine's HTTP surface. The admin UI and
//! the visualization page speak these shapes; domain types carry the actual
//! documents.

pub mod requests;
pub mod responses;

pub use requests::{
    CreateFolderRequest, ImportMapRequest, SaveEntityRequest, SaveMapRequest, SaveShortcutRequest,
    VisitFolderRequest,
};
pub use responses::{
    DriveMapListing, EntityListing, FolderListing, ImportedMap, MapSaveResponse, RemoteFolder,
    SaveEntityResponse, SidebarData, UploadResponse,
};
