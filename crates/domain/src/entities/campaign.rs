//! Path-keyed campaign state.
//!
//! The JSON-file-only storage mode: one document mapping slash-separated
//! paths (`"/"`, `"/Barrowmere"`, `"/Barrowmere/Crypt"`) to entity metadata,
//! bypassing the remote store entirely. Same tree-shape invariant as the
//! folder forest, keyed by path rather than id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::metadata::EntityMetadata;
use crate::error::DomainError;

pub const ROOT_PATH: &str = "/";
const ROOT_NAME: &str = "ROOT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignState {
    nodes: BTreeMap<String, EntityMetadata>,
}

impl CampaignState {
    /// Fresh state containing only the ROOT node.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(ROOT_PATH.to_string(), EntityMetadata::new(ROOT_NAME));
        Self { nodes }
    }

    /// Lenient load from raw JSON: a non-object or empty value yields a fresh
    /// state, and individually malformed entries are replaced with a default
    /// node named after the path's last segment.
    pub fn from_value(value: serde_json::Value) -> Self {
        let Some(raw) = value.as_object().filter(|map| !map.is_empty()) else {
            return Self::new();
        };

        let mut nodes = BTreeMap::new();
        for (path, entry) in raw {
            let meta = serde_json::from_value(entry.clone())
                .unwrap_or_else(|_| EntityMetadata::new(node_name(path)));
            nodes.insert(path.clone(), meta);
        }
        Self { nodes }
    }

    pub fn get(&self, path: &str) -> Result<&EntityMetadata, DomainError> {
        self.nodes
            .get(path)
            .ok_or_else(|| DomainError::not_found("CampaignNode", path))
    }

    pub fn set(&mut self, path: impl Into<String>, meta: EntityMetadata) {
        self.nodes.insert(path.into(), meta);
    }

    /// Fetch the node at `path`, inserting a default one named after the
    /// path's last segment when absent.
    pub fn ensure_node(&mut self, path: &str) -> &mut EntityMetadata {
        self.nodes
            .entry(path.to_string())
            .or_insert_with(|| EntityMetadata::new(node_name(path)))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Build the campaign tree by walking `sub` name lists from the root.
    ///
    /// A sub name with no node at its path becomes a leaf.
    pub fn build_tree(&self) -> Result<CampaignNode, DomainError> {
        let root = self.get(ROOT_PATH)?;
        Ok(CampaignNode {
            name: root.name.clone(),
            path: ROOT_PATH.to_string(),
            children: self.children_of(ROOT_PATH),
        })
    }

    fn children_of(&self, base_path: &str) -> Vec<CampaignNode> {
        let Ok(current) = self.get(base_path) else {
            return Vec::new();
        };

        current
            .sub
            .iter()
            .map(|sub| {
                let sub_path = join_path(base_path, sub);
                let children = self.children_of(&sub_path);
                CampaignNode {
                    name: sub.clone(),
                    path: sub_path,
                    children,
                }
            })
            .collect()
    }
}

impl Default for CampaignState {
    fn default() -> Self {
        Self::new()
    }
}

/// One node of the campaign tree: `{name, path, children}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignNode {
    pub name: String,
    pub path: String,
    pub children: Vec<CampaignNode>,
}

fn node_name(path: &str) -> &str {
    path.trim_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(ROOT_NAME)
}

fn join_path(base: &str, sub: &str) -> String {
    if base == ROOT_PATH {
        format!("/{sub}")
    } else {
        format!("{}/{sub}", base.trim_end_matches('/'))
    }
}
