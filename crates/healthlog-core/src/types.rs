//! Record data model shared by the extractors, the catalog and the orchestrator.
//!
//! Numeric fields that the user did not state are `None`, never a guessed
//! value. Both extraction paths produce these same types.

use serde::{Deserialize, Serialize};

/// What kind of record a message describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordIntent {
    Food,
    Weight,
    Exercise,
    None,
}

impl std::fmt::Display for RecordIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Food => write!(f, "food"),
            Self::Weight => write!(f, "weight"),
            Self::Exercise => write!(f, "exercise"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Record domain a caller expects, used to pick extraction rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Food,
    Weight,
    Exercise,
}

impl Domain {
    pub fn intent(self) -> RecordIntent {
        match self {
            Self::Food => RecordIntent::Food,
            Self::Weight => RecordIntent::Weight,
            Self::Exercise => RecordIntent::Exercise,
        }
    }
}

/// Caller context passed to every extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractHint {
    /// Restrict extraction to one domain.
    #[serde(default)]
    pub domain: Option<Domain>,
    /// The chat is in "record mode": a bare food name is a food record.
    #[serde(default)]
    pub record_mode: bool,
}

/// Meal slot a food entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTimeSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Unspecified,
}

impl MealTimeSlot {
    /// Parse the slot names used in model output. Unknown values are
    /// `Unspecified`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "breakfast" | "morning" | "朝" | "朝食" => Self::Breakfast,
            "lunch" | "noon" | "昼" | "昼食" => Self::Lunch,
            "dinner" | "evening" | "night" | "夜" | "夕食" => Self::Dinner,
            "snack" | "間食" | "おやつ" => Self::Snack,
            _ => Self::Unspecified,
        }
    }
}

impl std::fmt::Display for MealTimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Breakfast => write!(f, "breakfast"),
            Self::Lunch => write!(f, "lunch"),
            Self::Dinner => write!(f, "dinner"),
            Self::Snack => write!(f, "snack"),
            Self::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// One food item as the user wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodMention {
    /// The slice of the message this item came from.
    pub raw_text: String,
    /// Verbatim user phrasing, never embellished.
    pub display_text: String,
    /// Food name without the portion.
    pub base_name: String,
    /// Portion as typed, e.g. `100g` or `5個`.
    pub portion_text: Option<String>,
    pub meal_time: MealTimeSlot,
}

/// A (meal time, food text) pair before items are split apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealTimeText {
    pub meal_time: MealTimeSlot,
    pub food_text: String,
}

/// Raw food extraction as produced by an extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodExtraction {
    /// Food part of the message, quantities included.
    pub food_text: String,
    /// Slot of a single-slot message.
    pub meal_time: MealTimeSlot,
    /// Per-slot texts when the message names several meal times.
    pub meal_times: Vec<MealTimeText>,
    /// Explicit recording intent, as opposed to an ambiguous remark.
    pub is_definite: bool,
}

/// Food items eaten in one meal slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodGroup {
    pub meal_time: MealTimeSlot,
    pub food_text: String,
    pub items: Vec<FoodMention>,
}

/// Food groups in the order their slots appear in the message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiFoodExtraction {
    pub groups: Vec<FoodGroup>,
}

/// A body-weight reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightMention {
    pub value_kg: f64,
    pub body_fat_percent: Option<f64>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Cardio,
    Strength,
    Flexibility,
    Sports,
    Water,
    Winter,
    MartialArts,
    Dance,
    Daily,
}

impl ExerciseCategory {
    pub fn from_label(label: &str) -> Option<Self> {
        let category = match label.trim().to_lowercase().as_str() {
            "cardio" | "aerobic" => Self::Cardio,
            "strength" => Self::Strength,
            "flexibility" => Self::Flexibility,
            "sports" | "sport" => Self::Sports,
            "water" => Self::Water,
            "winter" => Self::Winter,
            "martial_arts" | "martial-arts" | "martialarts" => Self::MartialArts,
            "dance" => Self::Dance,
            "daily" => Self::Daily,
            _ => return None,
        };
        Some(category)
    }
}

impl std::fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Cardio => "cardio",
            Self::Strength => "strength",
            Self::Flexibility => "flexibility",
            Self::Sports => "sports",
            Self::Water => "water",
            Self::Winter => "winter",
            Self::MartialArts => "martial_arts",
            Self::Dance => "dance",
            Self::Daily => "daily",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

impl Intensity {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" | "light" => Some(Self::Low),
            "moderate" | "medium" => Some(Self::Moderate),
            "high" | "vigorous" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "morning" | "朝" => Some(Self::Morning),
            "afternoon" | "noon" | "昼" => Some(Self::Afternoon),
            "evening" | "夕方" => Some(Self::Evening),
            "night" | "夜" => Some(Self::Night),
            _ => None,
        }
    }
}

/// One weighted set specification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedSet {
    pub weight_kg: f64,
    pub reps: u32,
    pub set_count: u32,
}

/// One exercise described in a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseMention {
    pub category: ExerciseCategory,
    pub name: String,
    pub duration_minutes: Option<f64>,
    pub distance_km: Option<f64>,
    pub reps: Option<u32>,
    pub weight_kg: Option<f64>,
    pub set_count: Option<u32>,
    pub sets: Vec<WeightedSet>,
    pub time_of_day: Option<TimeOfDay>,
    pub intensity: Option<Intensity>,
    /// Calories stated by the generative path, if any.
    pub reported_calories: Option<u32>,
}

impl ExerciseMention {
    /// A mention with every measurement absent.
    pub fn new(category: ExerciseCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            duration_minutes: None,
            distance_km: None,
            reps: None,
            weight_kg: None,
            set_count: None,
            sets: Vec::new(),
            time_of_day: None,
            intensity: None,
            reported_calories: None,
        }
    }
}

/// Exercises in the order they appear in the message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiExerciseExtraction {
    pub exercises: Vec<ExerciseMention>,
}

/// Typed payload of a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Extraction {
    Weight(WeightMention),
    Food(FoodExtraction),
    Exercise(MultiExerciseExtraction),
    None,
}

/// Output of any extractor: intent, confidence and typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// In `[0, 1]`.
    pub confidence: f64,
    pub payload: Extraction,
}

impl Classification {
    pub fn none(confidence: f64) -> Self {
        Self {
            confidence,
            payload: Extraction::None,
        }
    }

    pub fn intent(&self) -> RecordIntent {
        match self.payload {
            Extraction::Weight(_) => RecordIntent::Weight,
            Extraction::Food(_) => RecordIntent::Food,
            Extraction::Exercise(_) => RecordIntent::Exercise,
            Extraction::None => RecordIntent::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_time_labels() {
        assert_eq!(MealTimeSlot::from_label("breakfast"), MealTimeSlot::Breakfast);
        assert_eq!(MealTimeSlot::from_label(" Lunch "), MealTimeSlot::Lunch);
        assert_eq!(MealTimeSlot::from_label("夕食"), MealTimeSlot::Dinner);
        assert_eq!(MealTimeSlot::from_label("brunch"), MealTimeSlot::Unspecified);
    }

    #[test]
    fn test_category_roundtrips_through_display() {
        for category in [
            ExerciseCategory::Cardio,
            ExerciseCategory::MartialArts,
            ExerciseCategory::Daily,
        ] {
            assert_eq!(ExerciseCategory::from_label(&category.to_string()), Some(category));
        }
        assert_eq!(ExerciseCategory::from_label("yoga"), None);
    }

    #[test]
    fn test_classification_intent() {
        let c = Classification {
            confidence: 0.8,
            payload: Extraction::Weight(WeightMention {
                value_kg: 70.0,
                body_fat_percent: None,
                confidence: 0.8,
            }),
        };
        assert_eq!(c.intent(), RecordIntent::Weight);
        assert_eq!(Classification::none(0.0).intent(), RecordIntent::None);
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let m = ExerciseMention::new(ExerciseCategory::Strength, "腕立て伏せ");
        let json = serde_json::to_value(&m).unwrap();
        assert!(json["durationMinutes"].is_null());
        assert!(json["weightKg"].is_null());
        assert_eq!(json["category"], "strength");
    }
}
