//! Flat folder cache mirrored from the remote store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::FileId;
use crate::tree;

/// One cached folder header: `{id, name, parent_id}`.
///
/// `parent_id` may reference an id absent from the cache; such entries are
/// treated as forest roots during reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub id: FileId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<FileId>,
}

impl FolderEntry {
    pub fn new(id: impl Into<FileId>, name: impl Into<String>, parent_id: Option<FileId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id,
        }
    }
}

/// Id-keyed flat mapping of every folder we know about.
///
/// Persisted as a single JSON document. Rebuilt wholesale from a full remote
/// listing, or updated one entry at a time as folders are visited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderCache {
    entries: HashMap<FileId, FolderEntry>,
}

impl FolderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = FolderEntry>) -> Self {
        let mut cache = Self::new();
        for entry in entries {
            cache.upsert(entry);
        }
        cache
    }

    /// Insert or replace the entry for a folder id.
    pub fn upsert(&mut self, entry: FolderEntry) {
        self.entries.insert(entry.id.clone(), entry);
    }

    pub fn get(&self, id: &FileId) -> Option<&FolderEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &FolderEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reconstruct the folder forest from this cache.
    pub fn to_forest(&self) -> Vec<FolderNode> {
        tree::build_forest(self)
    }
}

/// One node of the reconstructed folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    pub id: FileId,
    pub name: String,
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Total number of nodes in this subtree, the node itself included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(FolderNode::count).sum::<usize>()
    }
}
