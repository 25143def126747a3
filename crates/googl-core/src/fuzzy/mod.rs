//! Fuzzy Matching
//!
//! Finds the stored question closest to what the user typed.
//!
//! # Strategies
//!
//! - `sequence` (default): Ratcliff/Obershelp matching-block ratio
//! - `levenshtein`: normalized edit distance via `strsim`
//! - `jaro-winkler`: prefix-weighted similarity via `strsim`
//!
//! # Example
//!
//! ```rust
//! use googl_core::fuzzy::FuzzyEngine;
//!
//! let engine = FuzzyEngine::new();
//! let questions = ["What is your name?", "How old are you?"];
//! assert_eq!(
//!     engine.best_match("what is ur name", questions),
//!     Some("What is your name?".to_string())
//! );
//! ```

mod engine;
mod strategies;

pub use engine::{EngineConfig, FuzzyEngine, FuzzyMatch, Metric, ParseMetricError, DEFAULT_CUTOFF};
pub use strategies::{jaro_winkler_ratio, levenshtein_ratio, sequence_ratio};
