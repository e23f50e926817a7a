//! Entity document operations.
//!
//! Entities live as `metadata_<name>.json` files in the remote store. Every
//! successful save also re-derives the local NPC and faction indexes, so the
//! sidebar stays consistent as entities are renamed, moved, or re-tagged.

use std::sync::Arc;

use crate::infrastructure::ports::{
    entity_file_name, IndexRepo, RemoteStorePort, RepoError, StoreError,
};
use tablekeep_domain::{EntityMetadata, FileId, IndexEntry};
use tablekeep_shared::requests::SaveEntityRequest;

#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("Missing required field: {0}")]
    Validation(&'static str),
    #[error("Entity {0} not found")]
    NotFound(FileId),
    #[error("Entity {id} is not valid JSON: {message}")]
    Malformed { id: FileId, message: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Entity CRUD plus index maintenance.
pub struct EntityOps {
    remote: Arc<dyn RemoteStorePort>,
    indexes: Arc<dyn IndexRepo>,
}

impl EntityOps {
    pub fn new(remote: Arc<dyn RemoteStorePort>, indexes: Arc<dyn IndexRepo>) -> Self {
        Self { remote, indexes }
    }

    /// Fetch and parse one entity document.
    pub async fn get(&self, file_id: &FileId) -> Result<EntityMetadata, EntityError> {
        let content = self
            .remote
            .get_content(file_id)
            .await?
            .ok_or_else(|| EntityError::NotFound(file_id.clone()))?;

        serde_json::from_str(&content).map_err(|e| EntityError::Malformed {
            id: file_id.clone(),
            message: e.to_string(),
        })
    }

    /// Create or update an entity document, then re-derive the local indexes.
    ///
    /// When updating under a changed name, the remote file is renamed first;
    /// a failed rename is logged and the content update proceeds anyway.
    pub async fn save(&self, request: SaveEntityRequest) -> Result<FileId, EntityError> {
        if request.folder_id.as_str().is_empty() {
            return Err(EntityError::Validation("folder_id"));
        }
        if request.name.trim().is_empty() {
            return Err(EntityError::Validation("name"));
        }

        let file_name = entity_file_name(&request.name);
        let content = serde_json::to_string_pretty(&request.metadata)
            .map_err(|e| RepoError::Serialization(e.to_string()))?;

        let id = match &request.file_id {
            Some(file_id) => {
                let current = self.remote.get_metadata(file_id).await?;
                if current.map(|meta| meta.name != file_name).unwrap_or(false) {
                    if let Err(e) = self.remote.rename(file_id, &file_name).await {
                        tracing::warn!(
                            file_id = %file_id,
                            new_name = %file_name,
                            error = %e,
                            "Failed to rename entity file"
                        );
                    }
                }
                self.remote.update_content(file_id, &content).await?;
                file_id.clone()
            }
            None => {
                self.remote
                    .create_file(&file_name, &request.folder_id, &content)
                    .await?
            }
        };

        self.update_indexes(&id, &request)?;
        Ok(id)
    }

    /// Re-derive the NPC and faction index entries for a saved entity.
    fn update_indexes(&self, id: &FileId, request: &SaveEntityRequest) -> Result<(), RepoError> {
        let entry = IndexEntry {
            id: id.clone(),
            name: request.name.clone(),
            folder_id: request.folder_id.clone(),
            entity_type: request.metadata.entity_type.to_uppercase(),
        };

        if request.metadata.is_npc() {
            let mut npcs = self.indexes.load_npcs()?;
            npcs.upsert(entry.clone());
            self.indexes.save_npcs(&npcs)?;
        }

        // Factions are rebuilt on every save regardless of type, so removals
        // and re-tags take effect.
        let mut factions = self.indexes.load_factions()?;
        factions.reassign(entry, request.metadata.faction());
        self.indexes.save_factions(&factions)?;
        Ok(())
    }
}
