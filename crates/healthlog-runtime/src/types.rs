//! Record drafts handed to the persistence layer.

use serde::{Deserialize, Serialize};

use healthlog_catalog::{MatchSummary, NutritionEstimate};
use healthlog_core::{ExerciseMention, FoodMention, MealTimeSlot};

/// One record ready to be stored. Nothing has been written yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecordDraft {
    Weight(WeightDraft),
    Food(FoodDraft),
    Exercise(ExerciseDraft),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightDraft {
    pub value_kg: f64,
    pub body_fat_percent: Option<f64>,
    pub confidence: f64,
}

/// One meal slot and what was eaten in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDraft {
    pub meal_time: MealTimeSlot,
    pub food_text: String,
    pub items: Vec<FoodItemDraft>,
    /// Sum over the items that matched the catalog.
    pub total: NutritionEstimate,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemDraft {
    #[serde(flatten)]
    pub mention: FoodMention,
    pub catalog_match: Option<MatchSummary>,
    /// Catalog baseline, absent on a catalog miss.
    pub nutrition: Option<NutritionEstimate>,
}

/// Where an exercise's calorie figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalorieSource {
    /// Stated by the user and carried through by the model.
    Reported,
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDraft {
    #[serde(flatten)]
    pub mention: ExerciseMention,
    pub catalog_match: Option<MatchSummary>,
    /// METs used for the estimate.
    pub mets: f64,
    pub calories: u32,
    pub calorie_source: CalorieSource,
    pub confidence: f64,
}

impl RecordDraft {
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Weight(d) => d.confidence,
            Self::Food(d) => d.confidence,
            Self::Exercise(d) => d.confidence,
        }
    }
}
