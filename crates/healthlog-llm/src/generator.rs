use async_trait::async_trait;
use reqwest::Client;

use healthlog_core::Result;

use crate::providers::{collect_text, stream_llm};
use crate::types::{ChatMessage, ProviderSelection};

/// Turns a prompt into raw completion text.
///
/// The generative extractor only depends on this trait, so tests can swap
/// in a canned generator without a network.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// `TextGenerator` backed by a configured provider.
pub struct ProviderClient {
    client: Client,
    selection: ProviderSelection,
    temperature: f64,
    max_tokens: usize,
}

impl ProviderClient {
    pub fn new(client: Client, selection: ProviderSelection) -> Self {
        Self {
            client,
            selection,
            temperature: 0.1,
            max_tokens: 1024,
        }
    }

    pub fn selection(&self) -> &ProviderSelection {
        &self.selection
    }
}

#[async_trait]
impl TextGenerator for ProviderClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let stream = stream_llm(
            &self.client,
            self.selection.provider,
            vec![ChatMessage::user(prompt)],
            &self.selection.model,
            &self.selection.api_key,
            self.temperature,
            self.max_tokens,
        );
        collect_text(stream).await
    }
}
