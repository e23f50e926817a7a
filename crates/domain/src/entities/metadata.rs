//! Entity metadata documents.
//!
//! One `metadata_<name>.json` document per entity in the remote store.
//! Every field except `name` is optional on the wire.

use serde::{Deserialize, Serialize};

/// Nested element lists attached to a location entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elements {
    #[serde(default)]
    pub npc: Vec<String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub monsters: Vec<String>,
}

/// One entity document: an NPC, faction, map, or plain location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub music: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Names of sub-locations, used by the path-keyed campaign tree.
    #[serde(default)]
    pub sub: Vec<String>,
    #[serde(default)]
    pub elements: Elements,
    #[serde(default)]
    pub show_on_vis: bool,
    /// Classification used for index maintenance ("NPC", "MAP", ...).
    #[serde(default, rename = "type")]
    pub entity_type: String,
    /// Faction this entity belongs to; empty means none.
    #[serde(default)]
    pub fraction: String,
}

impl EntityMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            image: String::new(),
            music: String::new(),
            notes: String::new(),
            tags: Vec::new(),
            sub: Vec::new(),
            elements: Elements::default(),
            show_on_vis: false,
            entity_type: String::new(),
            fraction: String::new(),
        }
    }

    pub fn is_npc(&self) -> bool {
        self.entity_type.eq_ignore_ascii_case("NPC")
    }

    pub fn is_map(&self) -> bool {
        self.entity_type.eq_ignore_ascii_case("MAP")
    }

    /// Faction name with surrounding whitespace stripped; `None` when empty.
    pub fn faction(&self) -> Option<&str> {
        let trimmed = self.fraction.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let meta: EntityMetadata = serde_json::from_str(r#"{"name": "Bandit Camp"}"#).unwrap();
        assert_eq!(meta.name, "Bandit Camp");
        assert_eq!(meta.description, "");
        assert!(meta.tags.is_empty());
        assert!(meta.elements.npc.is_empty());
        assert!(!meta.show_on_vis);
        assert!(meta.faction().is_none());
    }

    #[test]
    fn type_field_round_trips_under_its_wire_name() {
        let meta: EntityMetadata =
            serde_json::from_str(r#"{"name": "Vex", "type": "npc"}"#).unwrap();
        assert!(meta.is_npc());
        let raw = serde_json::to_value(&meta).unwrap();
        assert_eq!(raw["type"], "npc");
    }

    #[test]
    fn faction_trims_whitespace() {
        let mut meta = EntityMetadata::new("Vex");
        meta.fraction = "  Iron Pact  ".to_string();
        assert_eq!(meta.faction(), Some("Iron Pact"));
        meta.fraction = "   ".to_string();
        assert_eq!(meta.faction(), None);
    }
}
