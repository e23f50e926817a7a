//! Application state and composition.

use std::path::PathBuf;
use std::sync::Arc;

use crate::infrastructure::persistence::JsonRepositories;
use crate::infrastructure::ports::RemoteStorePort;
use crate::infrastructure::proxy::ImageProxy;
use crate::stores::MapSyncStore;
use crate::use_cases::{
    CampaignOps, EntityOps, FolderTree, MapOps, SceneOps, SidebarOps, UploadOps,
};

/// Main application state.
///
/// Holds the use cases and shared stores. Passed to HTTP handlers via Axum
/// state.
pub struct App {
    pub use_cases: UseCases,
    pub map_sync: MapSyncStore,
    pub proxy: ImageProxy,
}

/// Container for all use cases.
pub struct UseCases {
    pub folders: FolderTree,
    pub entities: EntityOps,
    pub scene: SceneOps,
    pub sidebar: SidebarOps,
    pub campaign: CampaignOps,
    pub maps: MapOps,
    pub upload: UploadOps,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        remote: Arc<dyn RemoteStorePort>,
        repos: JsonRepositories,
        assets_dir: PathBuf,
        maps_dir: PathBuf,
    ) -> Self {
        let use_cases = UseCases {
            folders: FolderTree::new(remote.clone(), repos.folder_cache),
            entities: EntityOps::new(remote.clone(), repos.indexes.clone()),
            scene: SceneOps::new(repos.scene),
            sidebar: SidebarOps::new(repos.indexes),
            campaign: CampaignOps::new(repos.campaign),
            maps: MapOps::new(remote.clone(), assets_dir, maps_dir),
            upload: UploadOps::new(remote),
        };

        Self {
            use_cases,
            map_sync: MapSyncStore::new(),
            proxy: ImageProxy::new(),
        }
    }
}
