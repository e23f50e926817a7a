use serde::{Deserialize, Serialize};

use tablekeep_domain::FileId;

/// Persist a composited battle map rendered by the map tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMapRequest {
    /// PNG as base64, with or without a `data:image/png;base64,` prefix.
    pub image: String,
    /// Scale, grid info, token placement - stored verbatim next to the image.
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Pull a map entity's image + metadata down from the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportMapRequest {
    /// Id of the `metadata_*.json` document describing the map.
    pub metadata_id: FileId,
}
