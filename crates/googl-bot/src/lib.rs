//! GooglBot console agent
//!
//! Wires the core engine to a line-based console: math first, stored
//! answers second, and a teach-me prompt when neither applies.
//!
//! ```rust
//! use googl_bot::{Session, LEARNED};
//! use googl_core::{FuzzyEngine, MemoryStore};
//!
//! let mut session = Session::open(MemoryStore::new(), FuzzyEngine::new()).unwrap();
//! let mut output = Vec::new();
//! session
//!     .run("2^3\nCapital of France?\nParis\nquit\n".as_bytes(), &mut output)
//!     .unwrap();
//!
//! let transcript = String::from_utf8(output).unwrap();
//! assert!(transcript.contains("GooglBot: 8\n"));
//! assert!(transcript.contains(LEARNED));
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod tracing;

pub use config::BotConfig;
pub use error::{Error, Result};
pub use session::{
    Reply, Session, GREETING, LEARNED, PROMPT, SKIPPED, TEACH_PROMPT, UNKNOWN,
};
