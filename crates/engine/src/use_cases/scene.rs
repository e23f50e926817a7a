//! Scene state shown on the visualization page.

use std::sync::Arc;

use crate::infrastructure::drive::links;
use crate::infrastructure::ports::{RepoError, SceneStateRepo};
use tablekeep_domain::SceneState;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Missing required field: {0}")]
    Validation(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Get/set the shared image+music pair. Last writer wins.
pub struct SceneOps {
    repo: Arc<dyn SceneStateRepo>,
}

impl SceneOps {
    pub fn new(repo: Arc<dyn SceneStateRepo>) -> Self {
        Self { repo }
    }

    pub fn state(&self) -> Result<SceneState, SceneError> {
        Ok(self.repo.load()?)
    }

    /// Point the visualization at a new image. The link is normalized to the
    /// direct-view form before it ever reaches the document.
    pub fn set_image(&self, url: &str) -> Result<SceneState, SceneError> {
        if url.is_empty() {
            return Err(SceneError::Validation("url"));
        }

        let mut state = self.repo.load()?;
        state.current_image = links::normalize_link(url);
        self.repo.save(&state)?;
        Ok(state)
    }

    /// Swap the background music; stored verbatim.
    pub fn set_music(&self, url: &str) -> Result<SceneState, SceneError> {
        if url.is_empty() {
            return Err(SceneError::Validation("url"));
        }

        let mut state = self.repo.load()?;
        state.current_music = url.to_string();
        self.repo.save(&state)?;
        Ok(state)
    }
}
