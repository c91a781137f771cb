//! Defensive parsing of model output into typed classifications.
//!
//! The model is asked for one JSON object but may wrap it in a code fence or
//! prose. Anything that does not locate, parse and validate cleanly is
//! `None`, which sends the caller to the deterministic path.

use serde::Deserialize;
use tracing::debug;

use healthlog_catalog::match_exercise;
use healthlog_core::{
    Classification, Domain, ExerciseCategory, ExerciseMention, Extraction, FoodExtraction,
    Intensity, MealTimeSlot, MealTimeText, MultiExerciseExtraction, TimeOfDay, WeightMention,
    WeightedSet,
};

/// Used when a multi-exercise response omits its top-level confidence.
pub const MULTI_EXERCISE_DEFAULT_CONFIDENCE: f64 = 0.8;

/// Locate the JSON object inside a raw completion.
///
/// A ```` ```json ```` fence is stripped first when present. The first
/// balanced `{...}` span is returned, with braces inside strings ignored.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let body = fenced_body(raw).unwrap_or(raw);
    balanced_object(body)
}

fn fenced_body(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let rest = &raw[start + 3..];
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    let end = rest.find("```")?;
    Some(&rest[..end])
}

fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeightResponse {
    is_weight_record: bool,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    has_body_fat: Option<bool>,
    #[serde(default)]
    body_fat: Option<f64>,
    confidence: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MealTimeEntry {
    #[serde(default)]
    meal_time: Option<String>,
    food_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodResponse {
    is_food_record: bool,
    #[serde(default)]
    is_definite_record: Option<bool>,
    #[serde(default)]
    meal_time: Option<String>,
    #[serde(default)]
    is_multiple_meal_times: Option<bool>,
    #[serde(default)]
    meal_times: Option<Vec<MealTimeEntry>>,
    #[serde(default)]
    food_text: Option<String>,
    confidence: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetEntry {
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    reps: Option<f64>,
    #[serde(default)]
    sets: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseItem {
    #[serde(default)]
    exercise_type: Option<String>,
    #[serde(default)]
    exercise_name: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    intensity: Option<String>,
    #[serde(default)]
    sets: Option<f64>,
    #[serde(default)]
    reps: Option<f64>,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    time_of_day: Option<String>,
    #[serde(default)]
    weight_sets: Option<Vec<SetEntry>>,
    #[serde(default)]
    calories: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseResponse {
    #[serde(default)]
    is_exercise_record: Option<bool>,
    #[serde(default)]
    is_multiple_exercises: Option<bool>,
    #[serde(default)]
    exercises: Option<Vec<ExerciseItem>>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(flatten)]
    single: ExerciseItem,
}

/// Zero and negatives mean "not stated".
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn whole(value: Option<f64>) -> Option<u32> {
    positive(value)
        .map(|v| v.round())
        .filter(|v| *v >= 1.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32)
}

fn valid_confidence(confidence: f64) -> Option<f64> {
    (confidence.is_finite() && (0.0..=1.0).contains(&confidence)).then_some(confidence)
}

/// Parse one completion for the given domain.
pub fn parse_response(domain: Domain, raw: &str, weight_ceiling_kg: f64) -> Option<Classification> {
    let Some(json) = extract_json_object(raw) else {
        debug!("no JSON object in model output");
        return None;
    };
    let parsed = match domain {
        Domain::Weight => serde_json::from_str(json)
            .ok()
            .and_then(|r| weight_classification(r, weight_ceiling_kg)),
        Domain::Food => serde_json::from_str(json).ok().and_then(food_classification),
        Domain::Exercise => serde_json::from_str(json)
            .ok()
            .and_then(exercise_classification),
    };
    if parsed.is_none() {
        debug!(?domain, "model output failed validation");
    }
    parsed
}

fn weight_classification(r: WeightResponse, ceiling_kg: f64) -> Option<Classification> {
    let confidence = valid_confidence(r.confidence)?;
    if !r.is_weight_record {
        return Some(Classification::none(confidence));
    }
    let value_kg = positive(r.weight)?;
    if value_kg >= ceiling_kg {
        return Some(Classification::none(confidence));
    }
    let body_fat_percent = if r.has_body_fat.unwrap_or(true) {
        positive(r.body_fat).filter(|p| *p < 100.0)
    } else {
        None
    };
    Some(Classification {
        confidence,
        payload: Extraction::Weight(WeightMention {
            value_kg,
            body_fat_percent,
            confidence,
        }),
    })
}

fn slot(label: Option<&str>) -> MealTimeSlot {
    label.map_or(MealTimeSlot::Unspecified, MealTimeSlot::from_label)
}

fn food_classification(r: FoodResponse) -> Option<Classification> {
    let confidence = valid_confidence(r.confidence)?;
    if !r.is_food_record {
        return Some(Classification::none(confidence));
    }

    let meal_times: Vec<MealTimeText> = r
        .meal_times
        .unwrap_or_default()
        .into_iter()
        .filter(|m| !m.food_text.trim().is_empty())
        .map(|m| MealTimeText {
            meal_time: slot(m.meal_time.as_deref()),
            food_text: m.food_text.trim().to_string(),
        })
        .collect();
    let food_text = r
        .food_text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let extraction = if r.is_multiple_meal_times.unwrap_or(false) && meal_times.len() >= 2 {
        FoodExtraction {
            food_text: food_text.unwrap_or_else(|| {
                meal_times
                    .iter()
                    .map(|m| m.food_text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            }),
            meal_time: meal_times[0].meal_time,
            meal_times,
            is_definite: r.is_definite_record.unwrap_or(true),
        }
    } else {
        // A lone mealTimes entry is the same as a single-slot answer.
        let single = meal_times.into_iter().next();
        let (meal_time, food_text) = match (food_text, single) {
            (Some(text), single) => (
                r.meal_time
                    .as_deref()
                    .map(MealTimeSlot::from_label)
                    .or(single.map(|s| s.meal_time))
                    .unwrap_or(MealTimeSlot::Unspecified),
                text,
            ),
            (None, Some(single)) => (single.meal_time, single.food_text),
            (None, None) => return None,
        };
        FoodExtraction {
            food_text,
            meal_time,
            meal_times: Vec::new(),
            is_definite: r.is_definite_record.unwrap_or(false),
        }
    };

    Some(Classification {
        confidence,
        payload: Extraction::Food(extraction),
    })
}

fn exercise_mention(item: ExerciseItem) -> Option<ExerciseMention> {
    let name = item
        .exercise_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())?;
    let category = item
        .exercise_type
        .as_deref()
        .and_then(ExerciseCategory::from_label)
        .or_else(|| match_exercise(&name).map(|m| m.entry.category))
        .unwrap_or(ExerciseCategory::Daily);

    let sets: Vec<WeightedSet> = item
        .weight_sets
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| {
            Some(WeightedSet {
                weight_kg: positive(s.weight).unwrap_or(0.0),
                reps: whole(s.reps)?,
                set_count: whole(s.sets).unwrap_or(1),
            })
        })
        .collect();

    let mut mention = ExerciseMention::new(category, name);
    mention.duration_minutes = positive(item.duration);
    mention.distance_km = positive(item.distance);
    mention.reps = whole(item.reps);
    mention.weight_kg = positive(item.weight);
    mention.set_count = whole(item.sets);
    mention.sets = sets;
    mention.time_of_day = item.time_of_day.as_deref().and_then(TimeOfDay::from_label);
    mention.intensity = item.intensity.as_deref().and_then(Intensity::from_label);
    mention.reported_calories = whole(item.calories);
    Some(mention)
}

fn exercise_classification(r: ExerciseResponse) -> Option<Classification> {
    let multiple = r.is_multiple_exercises.unwrap_or(false) && r.exercises.is_some();
    let confidence = match r.confidence {
        Some(c) => valid_confidence(c)?,
        None if multiple => MULTI_EXERCISE_DEFAULT_CONFIDENCE,
        None => return None,
    };
    if !r.is_exercise_record.unwrap_or(multiple) {
        return Some(Classification::none(confidence));
    }

    let items = match r.exercises {
        Some(items) if multiple => items,
        _ => vec![r.single],
    };
    let exercises: Vec<ExerciseMention> = items.into_iter().filter_map(exercise_mention).collect();
    if exercises.is_empty() {
        return None;
    }
    Some(Classification {
        confidence,
        payload: Extraction::Exercise(MultiExerciseExtraction { exercises }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthlog_core::RecordIntent;

    #[test]
    fn test_extract_fenced_object() {
        let raw = "結果です:\n```json\n{\"a\": {\"b\": 1}}\n```\n以上";
        assert_eq!(extract_json_object(raw), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_extract_ignores_braces_in_strings() {
        let raw = r#"Sure! {"foodText": "}{ \"x\"", "n": 1} trailing {"#;
        assert_eq!(
            extract_json_object(raw),
            Some(r#"{"foodText": "}{ \"x\"", "n": 1}"#)
        );
    }

    #[test]
    fn test_extract_unbalanced_is_none() {
        assert_eq!(extract_json_object("{\"a\": 1"), None);
        assert_eq!(extract_json_object("no json here"), None);
    }

    #[test]
    fn test_weight_response() {
        let raw = r#"{"isWeightRecord": true, "weight": 63, "hasBodyFat": true, "bodyFat": 17, "confidence": 0.95}"#;
        let c = parse_response(Domain::Weight, raw, 500.0).unwrap();
        let Extraction::Weight(w) = c.payload else {
            panic!("expected weight");
        };
        assert_eq!(w.value_kg, 63.0);
        assert_eq!(w.body_fat_percent, Some(17.0));
    }

    #[test]
    fn test_weight_validation() {
        // wrong type
        let raw = r#"{"isWeightRecord": "yes", "weight": 63, "confidence": 0.9}"#;
        assert!(parse_response(Domain::Weight, raw, 500.0).is_none());
        // missing confidence
        let raw = r#"{"isWeightRecord": true, "weight": 63}"#;
        assert!(parse_response(Domain::Weight, raw, 500.0).is_none());
        // out of range confidence
        let raw = r#"{"isWeightRecord": true, "weight": 63, "confidence": 3}"#;
        assert!(parse_response(Domain::Weight, raw, 500.0).is_none());
        // implausible weight
        let raw = r#"{"isWeightRecord": true, "weight": 900, "confidence": 0.9}"#;
        let c = parse_response(Domain::Weight, raw, 500.0).unwrap();
        assert_eq!(c.intent(), RecordIntent::None);
    }

    #[test]
    fn test_not_a_record() {
        let raw = r#"{"isWeightRecord": false, "weight": null, "confidence": 0.9}"#;
        let c = parse_response(Domain::Weight, raw, 500.0).unwrap();
        assert_eq!(c.intent(), RecordIntent::None);
        assert_eq!(c.confidence, 0.9);
    }

    #[test]
    fn test_food_multiple_meal_times() {
        let raw = r#"```json
{"isFoodRecord": true, "isDefiniteRecord": true, "hasSpecificMealTime": true, "mealTime": null,
 "isMultipleMealTimes": true,
 "mealTimes": [{"mealTime": "breakfast", "foodText": "パンとコーヒー"}, {"mealTime": "lunch", "foodText": "カツ丼"}, {"mealTime": "dinner", "foodText": "納豆"}],
 "foodText": "", "confidence": 0.9}
```"#;
        let c = parse_response(Domain::Food, raw, 500.0).unwrap();
        let Extraction::Food(food) = c.payload else {
            panic!("expected food");
        };
        let slots: Vec<_> = food.meal_times.iter().map(|m| m.meal_time).collect();
        assert_eq!(
            slots,
            vec![MealTimeSlot::Breakfast, MealTimeSlot::Lunch, MealTimeSlot::Dinner]
        );
        assert_eq!(food.food_text, "パンとコーヒー カツ丼 納豆");
        assert!(food.is_definite);
    }

    #[test]
    fn test_food_single_slot() {
        let raw = r#"{"isFoodRecord": true, "isDefiniteRecord": true, "mealTime": "lunch", "isMultipleMealTimes": false, "mealTimes": [], "foodText": "ラーメン", "confidence": 0.9}"#;
        let c = parse_response(Domain::Food, raw, 500.0).unwrap();
        let Extraction::Food(food) = c.payload else {
            panic!("expected food");
        };
        assert_eq!(food.meal_time, MealTimeSlot::Lunch);
        assert_eq!(food.food_text, "ラーメン");
        assert!(food.meal_times.is_empty());
    }

    #[test]
    fn test_food_without_text_is_rejected() {
        let raw = r#"{"isFoodRecord": true, "foodText": "  ", "confidence": 0.9}"#;
        assert!(parse_response(Domain::Food, raw, 500.0).is_none());
    }

    #[test]
    fn test_exercise_zero_means_absent() {
        let raw = r#"{"isExerciseRecord": true, "isMultipleExercises": false, "exerciseType": "strength",
            "exerciseName": "ベンチプレス", "duration": 0, "sets": 3, "reps": 10, "weight": 80, "distance": 0,
            "weightSets": [{"weight": 80, "reps": 10, "sets": 3}], "confidence": 0.9}"#;
        let c = parse_response(Domain::Exercise, raw, 500.0).unwrap();
        let Extraction::Exercise(multi) = c.payload else {
            panic!("expected exercise");
        };
        let bench = &multi.exercises[0];
        assert_eq!(bench.category, ExerciseCategory::Strength);
        assert_eq!(bench.duration_minutes, None);
        assert_eq!(bench.distance_km, None);
        assert_eq!(bench.reps, Some(10));
        assert_eq!(
            bench.sets,
            vec![WeightedSet {
                weight_kg: 80.0,
                reps: 10,
                set_count: 3
            }]
        );
    }

    #[test]
    fn test_exercise_multiple() {
        let raw = r#"{"isExerciseRecord": true, "isMultipleExercises": true, "exercises": [
            {"exerciseType": "flexibility", "exerciseName": "ヨガ", "duration": 30},
            {"exerciseName": "スクワット", "reps": 20, "calories": 40},
            {"exerciseType": "cardio"}
        ]}"#;
        let c = parse_response(Domain::Exercise, raw, 500.0).unwrap();
        assert_eq!(c.confidence, MULTI_EXERCISE_DEFAULT_CONFIDENCE);
        let Extraction::Exercise(multi) = c.payload else {
            panic!("expected exercise");
        };
        assert_eq!(multi.exercises.len(), 2);
        assert_eq!(multi.exercises[0].duration_minutes, Some(30.0));
        // category from the catalog when the model omits it
        assert_eq!(multi.exercises[1].category, ExerciseCategory::Strength);
        assert_eq!(multi.exercises[1].reported_calories, Some(40));
    }

    #[test]
    fn test_exercise_single_requires_confidence() {
        let raw = r#"{"isExerciseRecord": true, "exerciseName": "ヨガ", "duration": 30}"#;
        assert!(parse_response(Domain::Exercise, raw, 500.0).is_none());
    }
}
