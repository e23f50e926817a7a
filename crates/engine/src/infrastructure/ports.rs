//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is
//! concrete types. Ports exist for:
//! - The remote file store (could swap Drive -> another document store)
//! - Local document persistence (could swap JSON files -> a database)

use async_trait::async_trait;

use tablekeep_domain::{
    CampaignState, FactionIndex, FileId, FolderCache, NpcIndex, SceneState, ShortcutEntry,
};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Remote store request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response from remote store: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// Remote Store Types
// =============================================================================

/// Folder mime type used by the remote store.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

const ENTITY_FILE_PREFIX: &str = "metadata_";
const ENTITY_FILE_SUFFIX: &str = ".json";

/// One file or folder as reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    pub id: FileId,
    pub name: String,
    pub mime_type: String,
    pub parents: Vec<FileId>,
    pub web_content_link: Option<String>,
}

impl RemoteItem {
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }

    /// Whether this file carries an entity document (`metadata_*.json`).
    pub fn is_entity_file(&self) -> bool {
        self.name.starts_with(ENTITY_FILE_PREFIX) && self.name.ends_with(ENTITY_FILE_SUFFIX)
    }

    /// Entity name with the `metadata_` / `.json` wrapper stripped.
    pub fn entity_name(&self) -> &str {
        self.name
            .strip_prefix(ENTITY_FILE_PREFIX)
            .and_then(|rest| rest.strip_suffix(ENTITY_FILE_SUFFIX))
            .unwrap_or(&self.name)
    }

    /// The remote store reports parents as a list; the first one is the
    /// folder the item is displayed under.
    pub fn parent_id(&self) -> Option<FileId> {
        self.parents.first().cloned()
    }
}

/// Remote file name for an entity document.
pub fn entity_file_name(entity_name: &str) -> String {
    format!("{ENTITY_FILE_PREFIX}{entity_name}{ENTITY_FILE_SUFFIX}")
}

// =============================================================================
// Remote Store Port
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStorePort: Send + Sync {
    /// Non-trashed children of a folder. `"root"`/empty resolves to the
    /// configured root folder.
    async fn list_children(&self, folder_id: &FileId) -> Result<Vec<RemoteItem>, StoreError>;

    /// Metadata for one file or folder; `None` when the remote says 404.
    async fn get_metadata(&self, id: &FileId) -> Result<Option<RemoteItem>, StoreError>;

    /// File body as UTF-8 text; `None` when the remote says 404.
    async fn get_content(&self, id: &FileId) -> Result<Option<String>, StoreError>;

    /// Raw file bytes.
    async fn download(&self, id: &FileId) -> Result<Vec<u8>, StoreError>;

    async fn create_folder(&self, name: &str, parent_id: &FileId) -> Result<FileId, StoreError>;

    async fn create_file(
        &self,
        name: &str,
        parent_id: &FileId,
        content: &str,
    ) -> Result<FileId, StoreError>;

    async fn update_content(&self, id: &FileId, content: &str) -> Result<(), StoreError>;

    async fn rename(&self, id: &FileId, new_name: &str) -> Result<(), StoreError>;

    /// Binary upload; returns the created item with its content link.
    async fn upload(
        &self,
        name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
        parent_id: &FileId,
    ) -> Result<RemoteItem, StoreError>;

    /// Grant anyone/reader on a file (used for uploaded images).
    async fn make_public(&self, id: &FileId) -> Result<(), StoreError>;

    /// Every folder in the corpus, paginated internally.
    async fn list_all_folders(&self) -> Result<Vec<RemoteItem>, StoreError>;

    /// Every `metadata_*.json` entity file in the corpus.
    async fn search_entity_files(&self) -> Result<Vec<RemoteItem>, StoreError>;
}

// =============================================================================
// Local Persistence Ports (whole-document JSON files)
// =============================================================================

// Loads return the document's default value when the file is missing or
// malformed; writes replace the whole document. No locking - last writer
// wins, per the persistence model.

#[cfg_attr(test, mockall::automock)]
pub trait FolderCacheRepo: Send + Sync {
    fn load(&self) -> Result<FolderCache, RepoError>;
    fn save(&self, cache: &FolderCache) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait IndexRepo: Send + Sync {
    fn load_npcs(&self) -> Result<NpcIndex, RepoError>;
    fn save_npcs(&self, index: &NpcIndex) -> Result<(), RepoError>;
    fn load_factions(&self) -> Result<FactionIndex, RepoError>;
    fn save_factions(&self, index: &FactionIndex) -> Result<(), RepoError>;
    fn load_shortcuts(&self) -> Result<Vec<ShortcutEntry>, RepoError>;
    fn save_shortcuts(&self, shortcuts: &[ShortcutEntry]) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait SceneStateRepo: Send + Sync {
    fn load(&self) -> Result<SceneState, RepoError>;
    fn save(&self, state: &SceneState) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait CampaignRepo: Send + Sync {
    fn load(&self) -> Result<CampaignState, RepoError>;
    fn save(&self, state: &CampaignState) -> Result<(), RepoError>;
}
