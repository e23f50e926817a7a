use serde::{Deserialize, Serialize};

use tablekeep_domain::{EntityMetadata, FileId};

/// Save (create or update) one `metadata_<name>.json` entity document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEntityRequest {
    /// Folder the entity file lives in (or is created in).
    pub folder_id: FileId,
    /// Entity name; also drives the remote file name.
    pub name: String,
    /// The full document to store.
    pub metadata: EntityMetadata,
    /// Existing file to update; absent means create.
    #[serde(default)]
    pub file_id: Option<FileId>,
}
