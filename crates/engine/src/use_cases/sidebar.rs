//! Sidebar shortcuts and the aggregate sidebar fetch.

use std::sync::Arc;

use crate::infrastructure::ports::{IndexRepo, RepoError};
use tablekeep_domain::{FileId, ShortcutEntry};
use tablekeep_shared::responses::SidebarData;

#[derive(Debug, thiserror::Error)]
pub enum SidebarError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct SidebarOps {
    indexes: Arc<dyn IndexRepo>,
}

impl SidebarOps {
    pub fn new(indexes: Arc<dyn IndexRepo>) -> Self {
        Self { indexes }
    }

    /// Pin a folder to the shortcut list; already-pinned ids are ignored.
    pub fn add_shortcut(&self, id: FileId, name: String) -> Result<(), SidebarError> {
        let mut shortcuts = self.indexes.load_shortcuts()?;
        if !shortcuts.iter().any(|shortcut| shortcut.id == id) {
            shortcuts.push(ShortcutEntry { id, name });
            self.indexes.save_shortcuts(&shortcuts)?;
        }
        Ok(())
    }

    /// Everything the sidebar renders, in one fetch.
    pub fn sidebar(&self) -> Result<SidebarData, SidebarError> {
        Ok(SidebarData {
            locations: self.indexes.load_shortcuts()?,
            npcs: self.indexes.load_npcs()?,
            fractions: self.indexes.load_factions()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tablekeep_domain::{FactionIndex, NpcIndex};

    #[derive(Default)]
    struct InMemoryIndexes {
        shortcuts: Mutex<Vec<ShortcutEntry>>,
    }

    impl IndexRepo for InMemoryIndexes {
        fn load_npcs(&self) -> Result<NpcIndex, RepoError> {
            Ok(NpcIndex::new())
        }
        fn save_npcs(&self, _index: &NpcIndex) -> Result<(), RepoError> {
            Ok(())
        }
        fn load_factions(&self) -> Result<FactionIndex, RepoError> {
            Ok(FactionIndex::new())
        }
        fn save_factions(&self, _index: &FactionIndex) -> Result<(), RepoError> {
            Ok(())
        }
        fn load_shortcuts(&self) -> Result<Vec<ShortcutEntry>, RepoError> {
            Ok(self.shortcuts.lock().unwrap().clone())
        }
        fn save_shortcuts(&self, shortcuts: &[ShortcutEntry]) -> Result<(), RepoError> {
            *self.shortcuts.lock().unwrap() = shortcuts.to_vec();
            Ok(())
        }
    }

    #[test]
    fn add_shortcut_dedups_by_id() {
        let indexes = Arc::new(InMemoryIndexes::default());
        let ops = SidebarOps::new(indexes.clone());

        ops.add_shortcut(FileId::new("a"), "Barrowmere".to_string()).unwrap();
        ops.add_shortcut(FileId::new("a"), "Barrowmere Renamed".to_string()).unwrap();
        ops.add_shortcut(FileId::new("b"), "Ashford".to_string()).unwrap();

        let shortcuts = indexes.shortcuts.lock().unwrap();
        assert_eq!(shortcuts.len(), 2);
        // The first pin wins; re-pinning does not rename.
        assert_eq!(shortcuts[0].name, "Barrowmere");
    }

    #[test]
    fn sidebar_aggregates_all_three_documents() {
        let ops = SidebarOps::new(Arc::new(InMemoryIndexes::default()));
        let data = ops.sidebar().unwrap();
        assert!(data.locations.is_empty());
        assert!(data.npcs.is_empty());
        assert!(data.fractions.is_empty());
    }
}
