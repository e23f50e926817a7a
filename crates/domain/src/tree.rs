//! Folder tree reconstruction.
//!
//! Turns the flat folder cache back into a nested forest. An entry whose
//! parent id is missing from the cache is a forest root. Entries on a parent
//! cycle are reachable from no root and drop out of the result; cycles are
//! not otherwise validated.

use std::collections::HashMap;

use crate::entities::folder::{FolderCache, FolderEntry, FolderNode};
use crate::ids::FileId;

/// Build the folder forest from the flat cache.
///
/// Children are sorted case-insensitively by name at every level, the root
/// list included.
pub fn build_forest(cache: &FolderCache) -> Vec<FolderNode> {
    let mut children_of: HashMap<&FileId, Vec<&FolderEntry>> = HashMap::new();
    let mut roots: Vec<&FolderEntry> = Vec::new();

    for entry in cache.entries() {
        match entry.parent_id.as_ref().filter(|pid| cache.contains(pid)) {
            Some(parent_id) => children_of.entry(parent_id).or_default().push(entry),
            None => roots.push(entry),
        }
    }

    let mut forest: Vec<FolderNode> = roots
        .into_iter()
        .map(|entry| build_node(entry, &children_of))
        .collect();
    sort_nodes(&mut forest);
    forest
}

fn build_node(entry: &FolderEntry, children_of: &HashMap<&FileId, Vec<&FolderEntry>>) -> FolderNode {
    let children = children_of
        .get(&entry.id)
        .map(|kids| kids.iter().map(|kid| build_node(kid, children_of)).collect())
        .unwrap_or_default();

    FolderNode {
        id: entry.id.clone(),
        name: entry.name.clone(),
        children,
    }
}

fn sort_nodes(nodes: &mut Vec<FolderNode>) {
    nodes.sort_by_key(|node| node.name.to_lowercase());
    for node in nodes {
        sort_nodes(&mut node.children);
    }
}
