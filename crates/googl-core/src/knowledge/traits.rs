//! Storage trait definitions

use super::base::KnowledgeBase;
use super::error::StoreResult;

/// Whole-document persistence for a knowledge base.
///
/// There is no incremental update: `save` always rewrites everything, and
/// `load` always reads everything.
pub trait KnowledgeStore {
    /// Load the stored knowledge base.
    ///
    /// Returns an empty base if nothing has been stored yet.
    fn load(&self) -> StoreResult<KnowledgeBase>;

    /// Replace the stored knowledge base with `kb`.
    fn save(&mut self, kb: &KnowledgeBase) -> StoreResult<()>;
}
