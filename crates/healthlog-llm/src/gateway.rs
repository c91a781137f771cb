//! Generative extraction gateway.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use healthlog_core::config::DEFAULT_WEIGHT_CEILING_KG;
use healthlog_core::{Classification, ExtractHint};
use healthlog_extract::{route_domain, Extractor};

use crate::generator::TextGenerator;
use crate::parse::parse_response;
use crate::prompts::build_prompt;

/// Asks a text generator for one domain and parses the answer.
///
/// Exactly one remote call per message. Any failure is `None`; the
/// caller owns the timeout and the fallback.
pub struct GenerativeExtractor {
    generator: Arc<dyn TextGenerator>,
    weight_ceiling_kg: f64,
}

impl GenerativeExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            weight_ceiling_kg: DEFAULT_WEIGHT_CEILING_KG,
        }
    }

    pub fn with_weight_ceiling(mut self, weight_ceiling_kg: f64) -> Self {
        self.weight_ceiling_kg = weight_ceiling_kg;
        self
    }
}

#[async_trait]
impl Extractor for GenerativeExtractor {
    fn name(&self) -> &'static str {
        "generative"
    }

    async fn extract(&self, text: &str, hint: ExtractHint) -> Option<Classification> {
        let text = text.trim();
        if text.is_empty() {
            return Some(Classification::none(0.0));
        }

        let domain = route_domain(text, &hint);
        debug!(?domain, text, "generative extraction");

        let raw = match self.generator.generate(&build_prompt(domain, text)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Generative call failed: {}", e);
                return None;
            }
        };

        let parsed = parse_response(domain, &raw, self.weight_ceiling_kg);
        if parsed.is_none() {
            warn!(?domain, "Unusable model output ({} bytes)", raw.len());
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use healthlog_core::{Domain, Error, Extraction, RecordIntent, Result};

    struct Canned {
        reply: String,
        calls: AtomicUsize,
        last_prompt: parking_lot::Mutex<String>,
    }

    impl Canned {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
                last_prompt: parking_lot::Mutex::new(String::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock() = prompt.to_string();
            Ok(self.reply.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(Error::Provider("API error 503".into()))
        }
    }

    #[tokio::test]
    async fn test_routes_and_parses() {
        let canned = Canned::new(
            "はい。\n```json\n{\"isWeightRecord\": true, \"weight\": 65, \"confidence\": 0.9}\n```",
        );
        let gateway = GenerativeExtractor::new(canned.clone());
        let c = gateway.extract("体重65kg", ExtractHint::default()).await.unwrap();
        assert!(matches!(c.payload, Extraction::Weight(ref w) if w.value_kg == 65.0));
        assert!(canned.last_prompt.lock().contains("isWeightRecord"));
        assert_eq!(canned.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hint_picks_prompt() {
        let canned = Canned::new(r#"{"isFoodRecord": false, "confidence": 0.7}"#);
        let gateway = GenerativeExtractor::new(canned.clone());
        let hint = ExtractHint {
            domain: Some(Domain::Food),
            record_mode: false,
        };
        let c = gateway.extract("65kg", hint).await.unwrap();
        assert_eq!(c.intent(), RecordIntent::None);
        assert!(canned.last_prompt.lock().contains("isFoodRecord"));
    }

    #[tokio::test]
    async fn test_failures_are_none_without_retry() {
        let gateway = GenerativeExtractor::new(Arc::new(Failing));
        assert!(gateway.extract("体重65kg", ExtractHint::default()).await.is_none());

        let canned = Canned::new("I can't help with that.");
        let gateway = GenerativeExtractor::new(canned.clone());
        assert!(gateway.extract("体重65kg", ExtractHint::default()).await.is_none());
        assert_eq!(canned.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ceiling_applies() {
        let canned = Canned::new(r#"{"isWeightRecord": true, "weight": 120, "confidence": 0.9}"#);
        let gateway = GenerativeExtractor::new(canned).with_weight_ceiling(100.0);
        let c = gateway.extract("体重120kg", ExtractHint::default()).await.unwrap();
        assert_eq!(c.intent(), RecordIntent::None);
    }
}
