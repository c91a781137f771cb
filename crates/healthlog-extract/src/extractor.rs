use async_trait::async_trait;
use healthlog_core::{Classification, ExtractHint};

/// Turns a chat message into a classified, typed extraction.
///
/// Both the generative and the deterministic path implement this, so the
/// orchestrator can swap one for the other without caring which ran.
/// `None` means the extractor could not produce a usable result.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(&self, text: &str, hint: ExtractHint) -> Option<Classification>;
}
