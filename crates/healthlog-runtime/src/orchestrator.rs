//! Ingestion orchestrator: extractor choice, splitting, catalog lookup and
//! calorie estimation for one message.

use std::sync::Arc;

use tracing::{debug, info};

use healthlog_catalog::{
    category_default_mets, estimate_calories, estimate_nutrition, match_exercise, match_food,
    CalorieConstants, CalorieInput, NutritionEstimate, Portion,
};
use healthlog_core::{
    Classification, ExerciseMention, ExtractHint, FoodGroup, PipelineConfig, RecordIntent,
    WeightMention, WeightedSet,
};
use healthlog_extract::{split, Entity, Extractor, FallbackExtractor};

use crate::types::*;

/// Turns chat messages into record drafts.
///
/// Holds no per-message state, so one instance serves any number of
/// concurrent `ingest` calls.
pub struct Orchestrator {
    config: PipelineConfig,
    primary: Option<Arc<dyn Extractor>>,
    fallback: FallbackExtractor,
    calories: CalorieConstants,
}

impl Orchestrator {
    /// Deterministic extraction only, until a primary is attached.
    pub fn new(config: PipelineConfig) -> Self {
        let fallback = FallbackExtractor::new(config.weight_ceiling_kg);
        Self {
            config,
            primary: None,
            fallback,
            calories: CalorieConstants::default(),
        }
    }

    pub fn with_primary(mut self, primary: Arc<dyn Extractor>) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn with_calorie_constants(mut self, calories: CalorieConstants) -> Self {
        self.calories = calories;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Name of the extractor tried first.
    pub fn primary_name(&self) -> &'static str {
        match (&self.primary, self.config.use_model) {
            (Some(primary), true) => primary.name(),
            _ => self.fallback.name(),
        }
    }

    /// Turn one message into zero or more drafts, in message order.
    ///
    /// An empty list means "not a record". Nothing here fails: remote errors,
    /// timeouts and bad model output all fall back to the deterministic path.
    pub async fn ingest(
        &self,
        text: &str,
        body_weight_kg: Option<f64>,
        hint: ExtractHint,
    ) -> Vec<RecordDraft> {
        let classification = self.classify(text, hint).await;
        self.drafts(&classification, text, body_weight_kg)
    }

    /// Primary extractor under the configured timeout, then at most one
    /// fallback attempt.
    pub async fn classify(&self, text: &str, hint: ExtractHint) -> Classification {
        if let (Some(primary), true) = (&self.primary, self.config.use_model) {
            match tokio::time::timeout(self.config.model_timeout, primary.extract(text, hint)).await {
                Ok(Some(classification)) => {
                    debug!(
                        extractor = primary.name(),
                        intent = %classification.intent(),
                        confidence = classification.confidence,
                        "classified"
                    );
                    return classification;
                }
                Ok(None) => info!("{} extractor gave no result, using fallback", primary.name()),
                Err(_) => info!(
                    "{} extractor timed out after {} ms, using fallback",
                    primary.name(),
                    self.config.model_timeout.as_millis()
                ),
            }
        }

        let classification = self.fallback.classify_and_extract(text, hint);
        debug!(
            extractor = self.fallback.name(),
            intent = %classification.intent(),
            confidence = classification.confidence,
            "classified"
        );
        classification
    }

    /// Drafts for an existing classification. Below the confidence floor
    /// there are none.
    pub fn drafts(
        &self,
        classification: &Classification,
        text: &str,
        body_weight_kg: Option<f64>,
    ) -> Vec<RecordDraft> {
        if classification.intent() == RecordIntent::None
            || classification.confidence < self.config.confidence_floor
        {
            return Vec::new();
        }

        let body_weight_kg = body_weight_kg
            .filter(|kg| kg.is_finite() && *kg > 0.0)
            .unwrap_or(self.config.default_body_weight_kg);
        let confidence = classification.confidence;

        split(classification, text)
            .into_iter()
            .map(|entity| match entity {
                Entity::Weight(w) => RecordDraft::Weight(weight_draft(w)),
                Entity::Food(group) => RecordDraft::Food(food_draft(group, confidence)),
                Entity::Exercise(mention) => RecordDraft::Exercise(self.exercise_draft(
                    mention,
                    body_weight_kg,
                    confidence,
                )),
            })
            .collect()
    }

    fn exercise_draft(
        &self,
        mention: ExerciseMention,
        body_weight_kg: f64,
        confidence: f64,
    ) -> ExerciseDraft {
        let matched = match_exercise(&mention.name);
        let entry = matched.map(|m| m.entry);
        let mets = entry.map_or_else(|| category_default_mets(mention.category), |e| e.mets);

        let (calories, calorie_source) = match mention.reported_calories {
            Some(kcal) => (kcal, CalorieSource::Reported),
            None => {
                let sets = effective_sets(&mention);
                let input = CalorieInput {
                    category: mention.category,
                    mets,
                    body_weight_kg,
                    duration_minutes: mention.duration_minutes.unwrap_or(0.0),
                    distance_km: mention.distance_km,
                    sets: &sets,
                    calories_per_km: entry.and_then(|e| e.calories_per_km),
                    calories_per_rep: entry.and_then(|e| e.calories_per_rep),
                };
                (estimate_calories(&input, &self.calories), CalorieSource::Estimated)
            }
        };

        ExerciseDraft {
            catalog_match: matched.map(|m| m.summary()),
            mention,
            mets,
            calories,
            calorie_source,
            confidence,
        }
    }
}

fn weight_draft(w: WeightMention) -> WeightDraft {
    WeightDraft {
        value_kg: w.value_kg,
        body_fat_percent: w.body_fat_percent,
        confidence: w.confidence,
    }
}

fn food_draft(group: FoodGroup, confidence: f64) -> FoodDraft {
    let items: Vec<FoodItemDraft> = group
        .items
        .into_iter()
        .map(|mention| {
            let matched = match_food(&mention.base_name);
            let nutrition = matched.map(|m| {
                estimate_nutrition(m.entry, Portion::from_text(mention.portion_text.as_deref()))
            });
            FoodItemDraft {
                catalog_match: matched.map(|m| m.summary()),
                nutrition,
                mention,
            }
        })
        .collect();
    let total = NutritionEstimate::total(items.iter().filter_map(|i| i.nutrition.as_ref()));

    FoodDraft {
        meal_time: group.meal_time,
        food_text: group.food_text,
        items,
        total,
        confidence,
    }
}

/// Explicit sets, or one set built from the aggregate reps/weight/sets.
fn effective_sets(mention: &ExerciseMention) -> Vec<WeightedSet> {
    if !mention.sets.is_empty() {
        return mention.sets.clone();
    }
    match mention.reps {
        Some(reps) => vec![WeightedSet {
            weight_kg: mention.weight_kg.unwrap_or(0.0),
            reps,
            set_count: mention.set_count.unwrap_or(1),
        }],
        None => Vec::new(),
    }
}
