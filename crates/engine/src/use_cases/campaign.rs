//! Path-keyed campaign tree (the Drive-less storage mode).

use std::sync::Arc;

use crate::infrastructure::ports::{CampaignRepo, RepoError};
use tablekeep_domain::{CampaignNode, DomainError};

#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct CampaignOps {
    repo: Arc<dyn CampaignRepo>,
}

impl CampaignOps {
    pub fn new(repo: Arc<dyn CampaignRepo>) -> Self {
        Self { repo }
    }

    /// Build the whole campaign tree from the path-keyed state document.
    pub fn tree(&self) -> Result<CampaignNode, CampaignError> {
        Ok(self.repo.load()?.build_tree()?)
    }
}
