//! Folder navigation and the local tree cache.
//!
//! Listing goes to the remote store; the tree itself is served from the flat
//! cache, refreshed either incrementally (one entry per visited folder) or
//! wholesale from a full remote listing when the incremental updates have
//! drifted.

use std::sync::Arc;

use crate::infrastructure::ports::{
    FolderCacheRepo, RemoteStorePort, RepoError, StoreError,
};
use tablekeep_domain::{FileId, FolderCache, FolderEntry, FolderNode};
use tablekeep_shared::requests::VisitFolderRequest;
use tablekeep_shared::responses::{EntityListing, FolderListing, RemoteFolder};

#[derive(Debug, thiserror::Error)]
pub enum FolderTreeError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Folder operations over the remote store and the flat cache.
pub struct FolderTree {
    remote: Arc<dyn RemoteStorePort>,
    cache: Arc<dyn FolderCacheRepo>,
}

impl FolderTree {
    pub fn new(remote: Arc<dyn RemoteStorePort>, cache: Arc<dyn FolderCacheRepo>) -> Self {
        Self { remote, cache }
    }

    /// List one folder's content, split into subfolders and entity files.
    pub async fn list(&self, folder_id: FileId) -> Result<FolderListing, FolderTreeError> {
        let items = self.remote.list_children(&folder_id).await?;

        let mut folder_name = "Root".to_string();
        let mut parent_id = None;
        if !folder_id.is_root_alias() {
            if let Some(meta) = self.remote.get_metadata(&folder_id).await? {
                folder_name = meta.name.clone();
                parent_id = meta.parent_id();
            }
        }

        let mut folders = Vec::new();
        let mut entities = Vec::new();
        for item in items {
            if item.is_folder() {
                folders.push(RemoteFolder {
                    id: item.id,
                    name: item.name,
                });
            } else if item.is_entity_file() {
                entities.push(EntityListing {
                    name: item.entity_name().to_string(),
                    file_name: item.name.clone(),
                    id: item.id,
                });
            }
        }

        Ok(FolderListing {
            folder_id,
            folder_name,
            parent_id,
            folders,
            entities,
        })
    }

    /// Create a folder in the remote store.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: &FileId,
    ) -> Result<FileId, FolderTreeError> {
        Ok(self.remote.create_folder(name, parent_id).await?)
    }

    /// Incremental cache update: record the folder the admin navigated into.
    ///
    /// Cheap, but can leave stale entries behind when folders are deleted
    /// remotely; `refresh` is the authoritative resync.
    pub async fn visit(&self, request: VisitFolderRequest) -> Result<(), FolderTreeError> {
        let mut cache = self.cache.load()?;
        cache.upsert(FolderEntry::new(request.id, request.name, request.parent_id));
        self.cache.save(&cache)?;
        Ok(())
    }

    /// Full refresh: rebuild the flat cache from a complete remote listing
    /// and return the reconstructed forest.
    pub async fn refresh(&self) -> Result<Vec<FolderNode>, FolderTreeError> {
        let folders = self.remote.list_all_folders().await?;

        let cache = FolderCache::from_entries(folders.into_iter().map(|folder| {
            let parent_id = folder.parent_id();
            FolderEntry::new(folder.id, folder.name, parent_id)
        }));

        self.cache.save(&cache)?;
        tracing::info!(folders = cache.len(), "Rebuilt folder cache from remote listing");
        Ok(cache.to_forest())
    }

    /// Reconstruct the forest from the local cache without remote calls.
    pub async fn tree(&self) -> Result<Vec<FolderNode>, FolderTreeError> {
        Ok(self.cache.load()?.to_forest())
    }
}
