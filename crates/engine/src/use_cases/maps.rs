//! Map tool operations: local asset listings, composited-map persistence,
//! and import of map entities from the remote store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::infrastructure::drive::links;
use crate::infrastructure::ports::{RemoteStorePort, StoreError};
use tablekeep_domain::EntityMetadata;
use tablekeep_shared::requests::{ImportMapRequest, SaveMapRequest};
use tablekeep_shared::responses::{DriveMapListing, ImportedMap, MapSaveResponse};

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];
const DEFAULT_MAP_NAME: &str = "untitled_map";

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Missing required field: {0}")]
    Validation(&'static str),
    #[error("Invalid image payload: {0}")]
    BadImage(String),
    #[error("Map {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MapError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

pub struct MapOps {
    remote: Arc<dyn RemoteStorePort>,
    assets_dir: PathBuf,
    maps_dir: PathBuf,
}

impl MapOps {
    pub fn new(
        remote: Arc<dyn RemoteStorePort>,
        assets_dir: impl Into<PathBuf>,
        maps_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            remote,
            assets_dir: assets_dir.into(),
            maps_dir: maps_dir.into(),
        }
    }

    /// Map art grouped by category subdirectory, as URL paths.
    pub fn list_assets(&self) -> Result<BTreeMap<String, Vec<String>>, MapError> {
        let mut assets = BTreeMap::new();
        let map_dir = self.assets_dir.join("map");
        for category in list_dir_names(&map_dir)? {
            let files = list_image_files(&map_dir.join(&category))?
                .into_iter()
                .map(|file| format!("/static/assets/map/{category}/{file}"))
                .collect();
            assets.insert(category, files);
        }
        Ok(assets)
    }

    /// Character token art, as URL paths.
    pub fn list_characters(&self) -> Result<Vec<String>, MapError> {
        Ok(list_image_files(&self.assets_dir.join("characters"))?
            .into_iter()
            .map(|file| format!("/static/assets/characters/{file}"))
            .collect())
    }

    /// Persist a composited map: the rendered PNG next to its metadata.
    pub fn save(&self, request: SaveMapRequest) -> Result<MapSaveResponse, MapError> {
        if request.image.is_empty() {
            return Err(MapError::Validation("image"));
        }

        // Strip a data-URL header if the canvas handed us one.
        let encoded = match request.image.split_once(',') {
            Some((_, encoded)) => encoded,
            None => request.image.as_str(),
        };
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| MapError::BadImage(e.to_string()))?;

        let name = clean_filename(request.filename.as_deref().unwrap_or(DEFAULT_MAP_NAME));
        std::fs::create_dir_all(&self.maps_dir)?;

        let image_path = self.maps_dir.join(format!("{name}.png"));
        std::fs::write(&image_path, bytes)?;

        let meta_text = serde_json::to_string_pretty(&request.metadata)
            .map_err(|e| MapError::Io(e.to_string()))?;
        std::fs::write(self.maps_dir.join(format!("{name}_meta.json")), meta_text)?;

        Ok(MapSaveResponse {
            path: image_path.to_string_lossy().into_owned(),
        })
    }

    /// Find every remote entity document tagged as a map.
    ///
    /// Candidate files are discovered by name, then fetched one by one to
    /// check the type tag; unreadable or unparseable documents are skipped.
    pub async fn drive_list(&self) -> Result<Vec<DriveMapListing>, MapError> {
        let candidates = self.remote.search_entity_files().await?;

        let mut maps = Vec::new();
        for file in candidates {
            let Some(content) = self.remote.get_content(&file.id).await? else {
                continue;
            };
            let Ok(meta) = serde_json::from_str::<EntityMetadata>(&content) else {
                continue;
            };
            if meta.is_map() {
                maps.push(DriveMapListing {
                    name: if meta.name.is_empty() {
                        file.name.clone()
                    } else {
                        meta.name.clone()
                    },
                    image: meta.image,
                    metadata_id: file.id.clone(),
                    id: file.id,
                });
            }
        }
        Ok(maps)
    }

    /// Download a remote map's image and metadata into local storage.
    ///
    /// The remote copy is left untouched.
    pub async fn import(&self, request: ImportMapRequest) -> Result<ImportedMap, MapError> {
        let content = self
            .remote
            .get_content(&request.metadata_id)
            .await?
            .ok_or_else(|| MapError::NotFound(request.metadata_id.to_string()))?;
        let meta: EntityMetadata =
            serde_json::from_str(&content).map_err(|e| MapError::BadImage(e.to_string()))?;

        let image_id = links::extract_file_id(&meta.image)
            .ok_or(MapError::Validation("image"))?;
        let bytes = self.remote.download(&image_id.into()).await?;

        let name = clean_filename(&meta.name);
        let name = if name.is_empty() {
            "imported_map".to_string()
        } else {
            name
        };
        std::fs::create_dir_all(&self.maps_dir)?;
        std::fs::write(self.maps_dir.join(format!("{name}.png")), bytes)?;

        let meta_text =
            serde_json::to_string_pretty(&meta).map_err(|e| MapError::Io(e.to_string()))?;
        std::fs::write(self.maps_dir.join(format!("{name}_meta.json")), meta_text)?;

        Ok(ImportedMap {
            local_path: format!("/data/maps/{name}.png"),
            metadata: meta,
        })
    }

    /// Resolve a saved-map file for serving. Names with path separators or
    /// parent references resolve to nothing.
    pub fn saved_map_path(&self, file_name: &str) -> Option<PathBuf> {
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name.contains("..")
        {
            return None;
        }
        let path = self.maps_dir.join(file_name);
        path.is_file().then_some(path)
    }
}

/// Keep alphanumerics, spaces, dashes, and underscores; trim the rest.
fn clean_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn list_dir_names(dir: &Path) -> Result<Vec<String>, MapError> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Ok(Vec::new());
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

fn list_image_files(dir: &Path) -> Result<Vec<String>, MapError> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Ok(Vec::new());
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_image = name
            .rsplit_once('.')
            .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if is_image && entry.path().is_file() {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockRemoteStorePort, RemoteItem};
    use serde_json::json;
    use tablekeep_domain::FileId;

    fn ops_with_dirs(remote: MockRemoteStorePort) -> (tempfile::TempDir, MapOps) {
        let dir = tempfile::tempdir().unwrap();
        let ops = MapOps::new(
            Arc::new(remote),
            dir.path().join("assets"),
            dir.path().join("maps"),
        );
        (dir, ops)
    }

    fn entity_file(id: &str, name: &str) -> RemoteItem {
        RemoteItem {
            id: FileId::new(id),
            name: name.to_string(),
            mime_type: "application/json".to_string(),
            parents: vec![],
            web_content_link: None,
        }
    }

    #[test]
    fn clean_filename_strips_everything_odd() {
        assert_eq!(clean_filename("Sunken Keep: v2/final"), "Sunken Keep v2final");
        assert_eq!(clean_filename("../../etc/passwd"), "etcpasswd");
        assert_eq!(clean_filename("  dungeon_3  "), "dungeon_3");
    }

    #[test]
    fn save_decodes_data_urls_and_writes_both_files() {
        let (_dir, ops) = ops_with_dirs(MockRemoteStorePort::new());
        let encoded = BASE64.encode(b"not really a png");

        let response = ops
            .save(SaveMapRequest {
                image: format!("data:image/png;base64,{encoded}"),
                metadata: json!({"grid": 32}),
                filename: Some("Sunken Keep".to_string()),
            })
            .unwrap();

        assert!(response.path.ends_with("Sunken Keep.png"));
        let written = std::fs::read(&response.path).unwrap();
        assert_eq!(written, b"not really a png");

        let meta_path = response.path.replace(".png", "_meta.json");
        let meta: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(meta_path).unwrap()).unwrap();
        assert_eq!(meta["grid"], 32);
    }

    #[test]
    fn save_accepts_bare_base64_and_defaults_the_name() {
        let (_dir, ops) = ops_with_dirs(MockRemoteStorePort::new());
        let response = ops
            .save(SaveMapRequest {
                image: BASE64.encode(b"png"),
                metadata: json!({}),
                filename: None,
            })
            .unwrap();
        assert!(response.path.ends_with("untitled_map.png"));
    }

    #[test]
    fn save_rejects_garbage_base64() {
        let (_dir, ops) = ops_with_dirs(MockRemoteStorePort::new());
        let result = ops.save(SaveMapRequest {
            image: "@@not-base64@@".to_string(),
            metadata: json!({}),
            filename: None,
        });
        assert!(matches!(result, Err(MapError::BadImage(_))));
    }

    #[tokio::test]
    async fn drive_list_keeps_only_map_entities() {
        let mut remote = MockRemoteStorePort::new();
        remote.expect_search_entity_files().returning(|| {
            Ok(vec![
                entity_file("m1", "metadata_Sunken Keep.json"),
                entity_file("n1", "metadata_Vex.json"),
                entity_file("b1", "metadata_Broken.json"),
            ])
        });
        remote
            .expect_get_content()
            .withf(|id| id.as_str() == "m1")
            .returning(|_| {
                Ok(Some(
                    r#"{"name": "Sunken Keep", "type": "MAP", "image": "https://drive.google.com/uc?export=view&id=IMG"}"#
                        .to_string(),
                ))
            });
        remote
            .expect_get_content()
            .withf(|id| id.as_str() == "n1")
            .returning(|_| Ok(Some(r#"{"name": "Vex", "type": "NPC"}"#.to_string())));
        remote
            .expect_get_content()
            .withf(|id| id.as_str() == "b1")
            .returning(|_| Ok(Some("{broken".to_string())));

        let (_dir, ops) = ops_with_dirs(remote);
        let maps = ops.drive_list().await.unwrap();

        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0].name, "Sunken Keep");
        assert_eq!(maps[0].metadata_id, FileId::new("m1"));
    }

    #[tokio::test]
    async fn import_downloads_image_and_metadata_locally() {
        let mut remote = MockRemoteStorePort::new();
        remote.expect_get_content().returning(|_| {
            Ok(Some(
                r#"{"name": "Sunken Keep", "type": "MAP", "image": "https://drive.google.com/uc?export=view&id=IMG"}"#
                    .to_string(),
            ))
        });
        remote
            .expect_download()
            .withf(|id| id.as_str() == "IMG")
            .returning(|_| Ok(b"png bytes".to_vec()));

        let (dir, ops) = ops_with_dirs(remote);
        let imported = ops
            .import(ImportMapRequest {
                metadata_id: FileId::new("m1"),
            })
            .await
            .unwrap();

        assert_eq!(imported.local_path, "/data/maps/Sunken Keep.png");
        assert_eq!(imported.metadata.name, "Sunken Keep");
        let image = std::fs::read(dir.path().join("maps").join("Sunken Keep.png")).unwrap();
        assert_eq!(image, b"png bytes");
        assert!(dir.path().join("maps").join("Sunken Keep_meta.json").is_file());
    }

    #[tokio::test]
    async fn import_rejects_unparseable_image_links() {
        let mut remote = MockRemoteStorePort::new();
        remote.expect_get_content().returning(|_| {
            Ok(Some(
                r#"{"name": "Sunken Keep", "type": "MAP", "image": "https://example.test/elsewhere.png"}"#
                    .to_string(),
            ))
        });

        let (_dir, ops) = ops_with_dirs(remote);
        let result = ops
            .import(ImportMapRequest {
                metadata_id: FileId::new("m1"),
            })
            .await;
        assert!(matches!(result, Err(MapError::Validation("image"))));
    }

    #[test]
    fn asset_listing_groups_by_category() {
        let (dir, ops) = ops_with_dirs(MockRemoteStorePort::new());
        let map_dir = dir.path().join("assets").join("map");
        std::fs::create_dir_all(map_dir.join("dungeon")).unwrap();
        std::fs::write(map_dir.join("dungeon").join("wall.png"), b"x").unwrap();
        std::fs::write(map_dir.join("dungeon").join("readme.txt"), b"x").unwrap();
        std::fs::create_dir_all(map_dir.join("forest")).unwrap();
        std::fs::write(map_dir.join("forest").join("tree.webp"), b"x").unwrap();

        let assets = ops.list_assets().unwrap();
        assert_eq!(
            assets["dungeon"],
            vec!["/static/assets/map/dungeon/wall.png"]
        );
        assert_eq!(assets["forest"], vec!["/static/assets/map/forest/tree.webp"]);
    }

    #[test]
    fn missing_asset_dirs_list_as_empty() {
        let (_dir, ops) = ops_with_dirs(MockRemoteStorePort::new());
        assert!(ops.list_assets().unwrap().is_empty());
        assert!(ops.list_characters().unwrap().is_empty());
    }

    #[test]
    fn saved_map_path_refuses_traversal() {
        let (dir, ops) = ops_with_dirs(MockRemoteStorePort::new());
        std::fs::create_dir_all(dir.path().join("maps")).unwrap();
        std::fs::write(dir.path().join("maps").join("keep.png"), b"x").unwrap();

        assert!(ops.saved_map_path("keep.png").is_some());
        assert!(ops.saved_map_path("../secrets.txt").is_none());
        assert!(ops.saved_map_path("sub/keep.png").is_none());
        assert!(ops.saved_map_path("missing.png").is_none());
    }
}
