//! Derived local indexes, kept consistent on every entity save.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::FileId;

/// Row shared by the NPC index and the faction rosters:
/// `{id, name, folder_id, type}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: FileId,
    pub name: String,
    pub folder_id: FileId,
    #[serde(default, rename = "type")]
    pub entity_type: String,
}

/// Flat NPC roster, at most one entry per id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NpcIndex {
    entries: Vec<IndexEntry>,
}

impl NpcIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the entry with a matching id in place, or append a new one.
    pub fn upsert(&mut self, entry: IndexEntry) {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Faction name -> member roster.
///
/// Membership is a function purely of the latest save: an entity sits in at
/// most one faction's list at a time. A `BTreeMap` keeps the persisted
/// document's key order stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionIndex {
    factions: BTreeMap<String, Vec<IndexEntry>>,
}

impl FactionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive the entity's membership: strip its id from every roster,
    /// drop rosters left empty, then append it to `faction` when given.
    pub fn reassign(&mut self, entry: IndexEntry, faction: Option<&str>) {
        for members in self.factions.values_mut() {
            members.retain(|member| member.id != entry.id);
        }
        self.factions.retain(|_, members| !members.is_empty());

        if let Some(name) = faction.map(str::trim).filter(|name| !name.is_empty()) {
            self.factions.entry(name.to_string()).or_default().push(entry);
        }
    }

    pub fn members(&self, faction: &str) -> Option<&[IndexEntry]> {
        self.factions.get(faction).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factions.is_empty()
    }
}

/// Sidebar shortcut to a folder: `{id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutEntry {
    pub id: FileId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> IndexEntry {
        IndexEntry {
            id: FileId::new(id),
            name: name.to_string(),
            folder_id: FileId::new("folder"),
            entity_type: "NPC".to_string(),
        }
    }

    #[test]
    fn upsert_twice_keeps_one_entry_with_latest_values() {
        let mut index = NpcIndex::new();
        index.upsert(entry("a", "Vex"));
        index.upsert(entry("a", "Vex the Betrayer"));

        assert_eq!(index.len(), 1);
        assert_eq!(index.iter().next().unwrap().name, "Vex the Betrayer");
    }

    #[test]
    fn upsert_appends_new_ids() {
        let mut index = NpcIndex::new();
        index.upsert(entry("a", "Vex"));
        index.upsert(entry("b", "Mara"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn reassign_moves_between_factions() {
        let mut index = FactionIndex::new();
        index.reassign(entry("a", "Vex"), Some("Iron Pact"));
        index.reassign(entry("a", "Vex"), Some("Ashen Circle"));

        assert!(index.members("Iron Pact").is_none());
        let members = index.members("Ashen Circle").unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, FileId::new("a"));
    }

    #[test]
    fn reassign_with_no_faction_removes_everywhere() {
        let mut index = FactionIndex::new();
        index.reassign(entry("a", "Vex"), Some("Iron Pact"));
        index.reassign(entry("a", "Vex"), None);

        assert!(index.is_empty());
    }

    #[test]
    fn empty_rosters_are_dropped_but_shared_ones_survive() {
        let mut index = FactionIndex::new();
        index.reassign(entry("a", "Vex"), Some("Iron Pact"));
        index.reassign(entry("b", "Mara"), Some("Iron Pact"));
        index.reassign(entry("a", "Vex"), Some("Ashen Circle"));

        assert_eq!(index.members("Iron Pact").unwrap().len(), 1);
        assert_eq!(index.members("Ashen Circle").unwrap().len(), 1);
    }

    #[test]
    fn blank_faction_name_counts_as_none() {
        let mut index = FactionIndex::new();
        index.reassign(entry("a", "Vex"), Some("   "));
        assert!(index.is_empty());
    }
}
