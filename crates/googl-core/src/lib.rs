//! GooglBot Core Engine
//!
//! The pieces of the console bot that have nothing to do with the console:
//!
//! - [`parser`] - lexer and recursive-descent parser for arithmetic input
//! - [`eval`] - safelisted evaluator with a session variable table
//! - [`fuzzy`] - closest-question lookup
//! - [`knowledge`] - question/answer model and its persistence
//!
//! # Example
//!
//! ```rust
//! use googl_core::eval::Evaluator;
//! use googl_core::fuzzy::FuzzyEngine;
//! use googl_core::knowledge::KnowledgeBase;
//!
//! let mut evaluator = Evaluator::new();
//! assert!(evaluator.attempt("What is your name?").is_none());
//!
//! let mut kb = KnowledgeBase::new();
//! kb.push("What is your name?", "GooglBot");
//!
//! let engine = FuzzyEngine::new();
//! let question = engine.best_match("what is ur name", kb.questions()).unwrap();
//! assert_eq!(kb.answer_for(&question), Some("GooglBot"));
//! ```

pub mod eval;
pub mod fuzzy;
pub mod knowledge;
pub mod parser;

// Re-export main types at crate root
pub use eval::{EvalError, Evaluator, Value, Variables};
pub use fuzzy::{EngineConfig, FuzzyEngine, FuzzyMatch, Metric};
pub use knowledge::{
    JsonFileStore, KnowledgeBase, KnowledgeEntry, KnowledgeStore, MemoryStore, StoreError,
};
pub use parser::{ParseError, Parser};
