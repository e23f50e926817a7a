//! JSON file persistence for the local documents.
//!
//! Every document is one pretty-printed UTF-8 JSON file under the data
//! directory, read and written whole. A missing or malformed file reads as
//! the document's default value; writes replace the file with no locking.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::infrastructure::ports::{
    CampaignRepo, FolderCacheRepo, IndexRepo, RepoError, SceneStateRepo,
};
use tablekeep_domain::{
    CampaignState, FactionIndex, FolderCache, NpcIndex, SceneState, ShortcutEntry,
};

const FOLDER_CACHE_FILE: &str = "local_folders.json";
const NPC_INDEX_FILE: &str = "local_npcs.json";
const FACTION_INDEX_FILE: &str = "local_fractions.json";
const SHORTCUTS_FILE: &str = "local_locations.json";
const SCENE_STATE_FILE: &str = "state.json";
const CAMPAIGN_STATE_FILE: &str = "campaign.json";

/// File-backed implementation of all local persistence ports.
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, file_name: &str) -> Result<T, RepoError> {
        let path = self.path(file_name);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(RepoError::Io(e.to_string())),
        };

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    error = %e,
                    "Malformed local document, falling back to default"
                );
                Ok(T::default())
            }
        }
    }

    fn save_pretty<T: Serialize>(&self, file_name: &str, value: &T) -> Result<(), RepoError> {
        let path = self.path(file_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RepoError::Io(e.to_string()))?;
        }
        let text =
            serde_json::to_string_pretty(value).map_err(|e| RepoError::Serialization(e.to_string()))?;
        std::fs::write(&path, text).map_err(|e| RepoError::Io(e.to_string()))
    }
}

impl FolderCacheRepo for JsonFileStore {
    fn load(&self) -> Result<FolderCache, RepoError> {
        self.load_or_default(FOLDER_CACHE_FILE)
    }

    fn save(&self, cache: &FolderCache) -> Result<(), RepoError> {
        self.save_pretty(FOLDER_CACHE_FILE, cache)
    }
}

impl IndexRepo for JsonFileStore {
    fn load_npcs(&self) -> Result<NpcIndex, RepoError> {
        self.load_or_default(NPC_INDEX_FILE)
    }

    fn save_npcs(&self, index: &NpcIndex) -> Result<(), RepoError> {
        self.save_pretty(NPC_INDEX_FILE, index)
    }

    fn load_factions(&self) -> Result<FactionIndex, RepoError> {
        self.load_or_default(FACTION_INDEX_FILE)
    }

    fn save_factions(&self, index: &FactionIndex) -> Result<(), RepoError> {
        self.save_pretty(FACTION_INDEX_FILE, index)
    }

    fn load_shortcuts(&self) -> Result<Vec<ShortcutEntry>, RepoError> {
        self.load_or_default(SHORTCUTS_FILE)
    }

    fn save_shortcuts(&self, shortcuts: &[ShortcutEntry]) -> Result<(), RepoError> {
        self.save_pretty(SHORTCUTS_FILE, &shortcuts)
    }
}

impl SceneStateRepo for JsonFileStore {
    fn load(&self) -> Result<SceneState, RepoError> {
        self.load_or_default(SCENE_STATE_FILE)
    }

    fn save(&self, state: &SceneState) -> Result<(), RepoError> {
        self.save_pretty(SCENE_STATE_FILE, state)
    }
}

impl CampaignRepo for JsonFileStore {
    fn load(&self) -> Result<CampaignState, RepoError> {
        // Lenient two-stage load: raw JSON first, then per-entry recovery.
        let raw: serde_json::Value = self.load_or_default(CAMPAIGN_STATE_FILE)?;
        Ok(CampaignState::from_value(raw))
    }

    fn save(&self, state: &CampaignState) -> Result<(), RepoError> {
        self.save_pretty(CAMPAIGN_STATE_FILE, state)
    }
}

/// Container wiring one file store into every local persistence port.
pub struct JsonRepositories {
    pub folder_cache: Arc<dyn FolderCacheRepo>,
    pub indexes: Arc<dyn IndexRepo>,
    pub scene: Arc<dyn SceneStateRepo>,
    pub campaign: Arc<dyn CampaignRepo>,
}

impl JsonRepositories {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let store = Arc::new(JsonFileStore::new(data_dir.as_ref()));
        Self {
            folder_cache: store.clone(),
            indexes: store.clone(),
            scene: store.clone(),
            campaign: store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekeep_domain::{FolderEntry, IndexEntry};

    fn store() -> (tempfile::TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data"));
        (dir, store)
    }

    #[test]
    fn missing_files_read_as_defaults() {
        let (_dir, store) = store();
        assert!(FolderCacheRepo::load(&store).unwrap().is_empty());
        assert!(store.load_npcs().unwrap().is_empty());
        assert!(store.load_factions().unwrap().is_empty());
        assert!(store.load_shortcuts().unwrap().is_empty());
        assert_eq!(SceneStateRepo::load(&store).unwrap(), SceneState::default());
    }

    #[test]
    fn malformed_files_read_as_defaults() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.data_dir.clone()).unwrap();
        std::fs::write(store.path(NPC_INDEX_FILE), "{not json").unwrap();
        assert!(store.load_npcs().unwrap().is_empty());
    }

    #[test]
    fn folder_cache_round_trips() {
        let (_dir, store) = store();
        let cache = FolderCache::from_entries([FolderEntry::new("a", "Ashford", None)]);
        FolderCacheRepo::save(&store, &cache).unwrap();
        assert_eq!(FolderCacheRepo::load(&store).unwrap(), cache);
    }

    #[test]
    fn documents_are_pretty_printed_with_non_ascii_preserved() {
        let (_dir, store) = store();
        let mut index = NpcIndex::new();
        index.upsert(IndexEntry {
            id: "a".into(),
            name: "Żmija".to_string(),
            folder_id: "f".into(),
            entity_type: "NPC".to_string(),
        });
        store.save_npcs(&index).unwrap();

        let text = std::fs::read_to_string(store.path(NPC_INDEX_FILE)).unwrap();
        assert!(text.contains("Żmija"));
        assert!(text.contains('\n'));
    }

    #[test]
    fn campaign_state_recovers_per_entry() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.data_dir.clone()).unwrap();
        std::fs::write(
            store.path(CAMPAIGN_STATE_FILE),
            r#"{"/": {"name": "ROOT"}, "/Barrowmere": {"name": 17}}"#,
        )
        .unwrap();

        let state = CampaignRepo::load(&store).unwrap();
        assert_eq!(state.get("/Barrowmere").unwrap().name, "Barrowmere");
    }

    #[test]
    fn scene_state_is_last_writer_wins() {
        let (_dir, store) = store();
        let mut state = SceneState::default();
        state.current_image = "first".to_string();
        SceneStateRepo::save(&store, &state).unwrap();
        state.current_image = "second".to_string();
        SceneStateRepo::save(&store, &state).unwrap();

        assert_eq!(SceneStateRepo::load(&store).unwrap().current_image, "second");
    }
}
