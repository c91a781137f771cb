//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Minimum confidence for an extraction to become a record.
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.5;
/// Budget for the single generative call per message.
pub const DEFAULT_MODEL_TIMEOUT_MS: u64 = 8_000;
/// Weights at or above this are rejected as implausible.
pub const DEFAULT_WEIGHT_CEILING_KG: f64 = 500.0;
/// Body weight used for calorie estimates when the caller has none.
pub const DEFAULT_BODY_WEIGHT_KG: f64 = 60.0;

/// Paths to HealthLog data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the root if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            llm_config_file: root.join("llm-config.json"),
            root,
        })
    }
}

/// Tuning for the ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Extractions below this confidence are not records.
    pub confidence_floor: f64,
    /// Upper bound on the generative call.
    #[serde(with = "duration_ms")]
    pub model_timeout: Duration,
    /// Sanity ceiling for body weight values.
    pub weight_ceiling_kg: f64,
    /// Used when the caller passes no body weight.
    pub default_body_weight_kg: f64,
    /// When false, the deterministic extractor is used directly.
    pub use_model: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            model_timeout: Duration::from_millis(DEFAULT_MODEL_TIMEOUT_MS),
            weight_ceiling_kg: DEFAULT_WEIGHT_CEILING_KG,
            default_body_weight_kg: DEFAULT_BODY_WEIGHT_KG,
            use_model: true,
        }
    }
}

impl PipelineConfig {
    /// Read overrides from `HEALTHLOG_*` environment variables.
    ///
    /// Unparseable or out-of-range values keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(floor) = env_parse::<f64>("HEALTHLOG_CONFIDENCE_FLOOR") {
            if (0.0..=1.0).contains(&floor) {
                config.confidence_floor = floor;
            }
        }
        if let Some(ms) = env_parse::<u64>("HEALTHLOG_MODEL_TIMEOUT_MS") {
            if ms > 0 {
                config.model_timeout = Duration::from_millis(ms);
            }
        }
        if let Some(ceiling) = env_parse::<f64>("HEALTHLOG_WEIGHT_CEILING_KG") {
            if ceiling > 0.0 {
                config.weight_ceiling_kg = ceiling;
            }
        }
        if let Some(kg) = env_parse::<f64>("HEALTHLOG_DEFAULT_BODY_WEIGHT_KG") {
            if kg > 0.0 {
                config.default_body_weight_kg = kg;
            }
        }
        if let Some(flag) = env_parse::<bool>("HEALTHLOG_USE_MODEL") {
            config.use_model = flag;
        }

        config
    }
}

/// Top-level HealthLog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthLogConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Pipeline tuning.
    pub pipeline: PipelineConfig,
}

impl HealthLogConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = env_parse("PORT").unwrap_or(3010);
        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            pipeline: PipelineConfig::from_env(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        warn!("Ignoring {}={:?}: not a valid value", key, raw);
    }
    parsed
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
