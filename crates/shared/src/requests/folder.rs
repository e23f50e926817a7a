use serde::{Deserialize, Serialize};

use tablekeep_domain::FileId;

/// Create a folder in the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    pub parent_id: FileId,
    pub name: String,
}

/// Record a navigated-into folder in the local flat cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitFolderRequest {
    pub id: FileId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<FileId>,
}

/// Pin a folder to the sidebar shortcut list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveShortcutRequest {
    pub id: FileId,
    pub name: String,
}
