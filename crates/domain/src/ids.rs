use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote file store.
///
/// The remote store is the source of truth for identity: ids are opaque
/// strings minted remotely, never locally. Uniqueness is the remote store's
/// guarantee, not ours.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// `"root"` and the empty string are aliases for the configured root
    /// folder, resolved by the remote store adapter.
    pub fn is_root_alias(&self) -> bool {
        self.0.is_empty() || self.0 == "root"
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for FileId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for FileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_aliases() {
        assert!(FileId::new("root").is_root_alias());
        assert!(FileId::new("").is_root_alias());
        assert!(!FileId::new("1AbcDef").is_root_alias());
    }

    #[test]
    fn serializes_as_bare_string() {
        let id = FileId::new("1AbcDef");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1AbcDef\"");
    }
}
