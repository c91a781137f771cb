//! Ingestion runtime: turns one chat message into record drafts.
//!
//! The orchestrator tries the primary (generative) extractor under a
//! timeout, falls back once to the deterministic extractor, then splits,
//! matches against the catalogs and estimates calories.

pub mod orchestrator;
pub mod types;

pub use orchestrator::Orchestrator;
pub use types::*;
