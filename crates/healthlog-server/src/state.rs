//! Shared application state.

use std::sync::Arc;

use healthlog_core::{HealthLogConfig, PipelineConfig};
use healthlog_llm::{GenerativeExtractor, LLMConfig, ProviderClient};
use healthlog_runtime::Orchestrator;
use parking_lot::RwLock;
use reqwest::Client;
use tracing::info;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: HealthLogConfig,
    pub llm_config: RwLock<LLMConfig>,
    pub http: Client,
    orchestrator: RwLock<Arc<Orchestrator>>,
}

impl AppState {
    pub fn new(config: HealthLogConfig, llm_config: LLMConfig) -> Self {
        let http = Client::new();
        let orchestrator = build_orchestrator(&config.pipeline, &llm_config, &http);
        Self {
            config,
            llm_config: RwLock::new(llm_config),
            http,
            orchestrator: RwLock::new(Arc::new(orchestrator)),
        }
    }

    /// Orchestrator for one request. Cloned out so no lock is held across
    /// the model call.
    pub fn orchestrator(&self) -> Arc<Orchestrator> {
        self.orchestrator.read().clone()
    }

    /// Rebuild the orchestrator after the provider config changed.
    pub fn reload_orchestrator(&self) {
        let orchestrator = {
            let llm_config = self.llm_config.read();
            build_orchestrator(&self.config.pipeline, &llm_config, &self.http)
        };
        *self.orchestrator.write() = Arc::new(orchestrator);
    }
}

fn build_orchestrator(pipeline: &PipelineConfig, llm_config: &LLMConfig, http: &Client) -> Orchestrator {
    let orchestrator = Orchestrator::new(pipeline.clone());
    match llm_config.resolve_provider() {
        Some(selection) => {
            info!(
                "Generative extraction via {} ({})",
                selection.provider, selection.model
            );
            let client = ProviderClient::new(http.clone(), selection);
            let gateway = GenerativeExtractor::new(Arc::new(client))
                .with_weight_ceiling(pipeline.weight_ceiling_kg);
            orchestrator.with_primary(Arc::new(gateway))
        }
        None => {
            info!("No LLM provider configured, using deterministic extraction only");
            orchestrator
        }
    }
}
