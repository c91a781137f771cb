//! Deterministic fallback extractor. Keyword and regex rules, no I/O.

pub mod exercise;
pub mod food;
pub mod weight;

use async_trait::async_trait;
use tracing::debug;

use healthlog_core::config::DEFAULT_WEIGHT_CEILING_KG;
use healthlog_core::text::{fold_width, is_question};
use healthlog_core::{
    Classification, Domain, ExtractHint, Extraction, MultiExerciseExtraction,
};

use crate::extractor::Extractor;

/// Classification order when the caller gives no domain.
const DOMAIN_ORDER: [Domain; 3] = [Domain::Exercise, Domain::Weight, Domain::Food];

#[derive(Debug, Clone, Copy)]
pub struct FallbackExtractor {
    weight_ceiling_kg: f64,
}

impl Default for FallbackExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT_CEILING_KG)
    }
}

impl FallbackExtractor {
    pub fn new(weight_ceiling_kg: f64) -> Self {
        Self { weight_ceiling_kg }
    }

    /// Classify and extract in one pass. Never fails; an unrecognised
    /// message is `NONE` with zero confidence.
    pub fn classify_and_extract(&self, text: &str, hint: ExtractHint) -> Classification {
        let text = text.trim();
        if text.is_empty() || is_question(text) {
            return Classification::none(0.0);
        }

        let folded = fold_width(text);
        let domains: &[Domain] = match &hint.domain {
            Some(domain) => std::slice::from_ref(domain),
            None => &DOMAIN_ORDER,
        };

        for domain in domains {
            if let Some(classification) = self.try_domain(*domain, text, &folded, hint) {
                debug!(intent = %classification.intent(), confidence = classification.confidence, "fallback classified");
                return classification;
            }
        }
        Classification::none(0.0)
    }

    fn try_domain(
        &self,
        domain: Domain,
        text: &str,
        folded: &str,
        hint: ExtractHint,
    ) -> Option<Classification> {
        match domain {
            Domain::Exercise => {
                let (exercises, confidence) = exercise::detect_exercises(folded)?;
                Some(Classification {
                    confidence,
                    payload: Extraction::Exercise(MultiExerciseExtraction { exercises }),
                })
            }
            Domain::Weight => {
                let mention = weight::detect_weight(folded, self.weight_ceiling_kg)?;
                Some(Classification {
                    confidence: mention.confidence,
                    payload: Extraction::Weight(mention),
                })
            }
            Domain::Food => {
                let (food, confidence) = food::detect_food(text, hint.record_mode)?;
                Some(Classification {
                    confidence,
                    payload: Extraction::Food(food),
                })
            }
        }
    }
}

#[async_trait]
impl Extractor for FallbackExtractor {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn extract(&self, text: &str, hint: ExtractHint) -> Option<Classification> {
        Some(self.classify_and_extract(text, hint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthlog_core::{ExerciseCategory, RecordIntent};

    fn classify(text: &str) -> Classification {
        FallbackExtractor::default().classify_and_extract(text, ExtractHint::default())
    }

    #[test]
    fn test_weight_scenario() {
        let c = classify("81.5kg");
        let Extraction::Weight(w) = c.payload else {
            panic!("expected weight, got {:?}", c.payload);
        };
        assert_eq!(w.value_kg, 81.5);
        assert!(c.confidence >= 0.8);
    }

    #[test]
    fn test_full_width_weight() {
        let c = classify("体重　８１．５ｋｇ");
        assert_eq!(c.intent(), RecordIntent::Weight);
    }

    #[test]
    fn test_push_up_scenario() {
        let c = classify("腕立て 10");
        let Extraction::Exercise(ex) = c.payload else {
            panic!("expected exercise");
        };
        let m = &ex.exercises[0];
        assert_eq!(m.category, ExerciseCategory::Strength);
        assert_eq!(m.name, "腕立て伏せ");
        assert_eq!(m.reps, Some(10));
        assert_eq!(m.duration_minutes, None);
    }

    #[test]
    fn test_small_talk_is_none() {
        let c = classify("今日は天気がいいですね");
        assert_eq!(c.intent(), RecordIntent::None);
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn test_questions_are_none() {
        assert_eq!(classify("体重どうやって減らす？").intent(), RecordIntent::None);
        assert_eq!(classify("ラーメンのカロリーは?").intent(), RecordIntent::None);
    }

    #[test]
    fn test_exercise_before_weight() {
        // キロ is a weight unit but here it is a distance
        let c = classify("ランニング 5キロ");
        assert_eq!(c.intent(), RecordIntent::Exercise);
    }

    #[test]
    fn test_hint_restricts_domain() {
        let fallback = FallbackExtractor::default();
        let hint = ExtractHint {
            domain: Some(Domain::Food),
            record_mode: false,
        };
        assert_eq!(
            fallback.classify_and_extract("81.5kg", hint).intent(),
            RecordIntent::None
        );
    }

    #[test]
    fn test_record_mode_accepts_bare_food() {
        let fallback = FallbackExtractor::default();
        let hint = ExtractHint {
            domain: None,
            record_mode: true,
        };
        let c = fallback.classify_and_extract("カツ丼", hint);
        assert_eq!(c.intent(), RecordIntent::Food);
    }

    #[test]
    fn test_ceiling_is_configurable() {
        let fallback = FallbackExtractor::new(100.0);
        let c = fallback.classify_and_extract("体重120kg", ExtractHint::default());
        assert_eq!(c.intent(), RecordIntent::None);
    }

    #[tokio::test]
    async fn test_extractor_always_returns_some() {
        let fallback = FallbackExtractor::default();
        let result = fallback.extract("こんにちは", ExtractHint::default()).await;
        assert_eq!(result, Some(Classification::none(0.0)));
        assert_eq!(fallback.name(), "fallback");
    }
}
