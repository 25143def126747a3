//! Knowledge Store
//!
//! Question/answer pairs learned during conversations, persisted as one
//! JSON document:
//!
//! ```json
//! {
//!   "questions": [
//!     { "question": "What is your name?", "answer": "GooglBot" }
//!   ]
//! }
//! ```
//!
//! Backends implement [`KnowledgeStore`]:
//!
//! - **JSON file**: [`JsonFileStore`], the default for the console bot
//! - **Memory**: [`MemoryStore`], for tests
//!
//! # Example
//!
//! ```rust
//! use googl_core::knowledge::{KnowledgeStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! let mut kb = store.load().unwrap();
//! kb.push("What is your name?", "GooglBot");
//! store.save(&kb).unwrap();
//!
//! assert_eq!(store.load().unwrap().answer_for("What is your name?"), Some("GooglBot"));
//! ```

mod base;
mod error;
mod file;
mod memory;
mod traits;

pub use base::{KnowledgeBase, KnowledgeEntry};
pub use error::{StoreError, StoreResult};
pub use file::{load, save, JsonFileStore, DEFAULT_PATH};
pub use memory::MemoryStore;
pub use traits::KnowledgeStore;
