//! Shared scene state shown on the public visualization page.

use serde::{Deserialize, Serialize};

/// Current image/music pair, one shared document.
///
/// Last writer wins; the visualization page polls this as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneState {
    #[serde(default)]
    pub current_image: String,
    #[serde(default)]
    pub current_music: String,
}
