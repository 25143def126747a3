//! In-memory storage backend
//!
//! Keeps the last saved knowledge base in memory. Useful for tests and for
//! sessions that should not touch the filesystem.

use super::base::KnowledgeBase;
use super::error::StoreResult;
use super::traits::KnowledgeStore;

/// In-memory knowledge store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    stored: KnowledgeBase,
    saves: usize,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store that already holds `kb`.
    pub fn with_base(kb: KnowledgeBase) -> Self {
        Self { stored: kb, saves: 0 }
    }

    /// The currently stored knowledge base.
    pub fn stored(&self) -> &KnowledgeBase {
        &self.stored
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl KnowledgeStore for MemoryStore {
    fn load(&self) -> StoreResult<KnowledgeBase> {
        Ok(self.stored.clone())
    }

    fn save(&mut self, kb: &KnowledgeBase) -> StoreResult<()> {
        self.stored = kb.clone();
        self.saves += 1;
        Ok(())
    }
}
