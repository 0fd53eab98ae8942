//! Mealwise client — the menu-side half of the analysis pipeline.
//!
//! Keeps a local name → analysis map seeded from the server's published
//! cache, asks the API about unknown dishes in batches, and falls back to
//! the keyword heuristic whenever the server can't answer.

pub mod analyzer;
pub mod config;
pub mod error;

pub use analyzer::MenuAnalyzer;
pub use config::ClientConfig;
pub use error::ClientError;
