//! Response payloads returned by the engine.

use serde::{Deserialize, Serialize};

use tablekeep_domain::{EntityMetadata, FactionIndex, FileId, NpcIndex, ShortcutEntry};

/// A folder as listed from the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFolder {
    pub id: FileId,
    pub name: String,
}

/// An entity file (`metadata_*.json`) as listed from the remote store,
/// with the wrapper stripped off the display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityListing {
    pub id: FileId,
    pub name: String,
    pub file_name: String,
}

/// One folder's content, split into subfolders and entity documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderListing {
    pub folder_id: FileId,
    pub folder_name: String,
    #[serde(default)]
    pub parent_id: Option<FileId>,
    pub folders: Vec<RemoteFolder>,
    pub entities: Vec<EntityListing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEntityResponse {
    pub id: FileId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub id: FileId,
    /// Direct-view link for images, the store's content link otherwise.
    pub link: String,
}

/// Aggregate payload for the admin sidebar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidebarData {
    pub locations: Vec<ShortcutEntry>,
    pub npcs: NpcIndex,
    pub fractions: FactionIndex,
}

/// A remote entity document classified as a battle map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveMapListing {
    pub id: FileId,
    pub name: String,
    pub image: String,
    /// Id of the metadata document itself (what import takes).
    pub metadata_id: FileId,
}

/// Result of importing a remote map into local storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedMap {
    pub local_path: String,
    pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSaveResponse {
    pub path: String,
}
