//! HealthLog Core: record data model, configuration and error types.

pub mod config;
pub mod error;
pub mod text;
pub mod types;

pub use config::{DataPaths, HealthLogConfig, PipelineConfig};
pub use error::{Error, Result};
pub use types::*;
