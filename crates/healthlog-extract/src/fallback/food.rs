//! Food detection.

use healthlog_catalog::food::food_keywords_longest_first;
use healthlog_core::{FoodExtraction, MealTimeSlot};

use crate::markers::{clean_phrase, find_meal_markers, slice_by_markers, FOOD_TRIGGERS};

pub const TRIGGER_CONFIDENCE: f64 = 0.8;
/// A bare food name accepted only because the chat is in record mode.
pub const RECORD_MODE_CONFIDENCE: f64 = 0.6;

pub fn has_food_keyword(text: &str) -> bool {
    food_keywords_longest_first().iter().any(|kw| text.contains(kw))
}

pub fn has_food_trigger(text: &str) -> bool {
    FOOD_TRIGGERS.iter().any(|t| text.contains(t))
}

pub fn detect_food(text: &str, record_mode: bool) -> Option<(FoodExtraction, f64)> {
    let markers = find_meal_markers(text);

    // `朝ごはん食べた` names a meal, not a food
    let mut without_markers = text.to_string();
    for hit in markers.iter().rev() {
        without_markers.replace_range(hit.start..hit.end, " ");
    }
    if !has_food_keyword(&without_markers) {
        return None;
    }

    let is_definite = has_food_trigger(text) || !markers.is_empty();
    if !is_definite && !record_mode {
        return None;
    }

    let mut segments = slice_by_markers(text);
    let extraction = match segments.len() {
        0 => FoodExtraction {
            food_text: clean_phrase(text),
            meal_time: markers.first().map_or(MealTimeSlot::Unspecified, |m| m.slot),
            meal_times: Vec::new(),
            is_definite,
        },
        1 => {
            let only = segments.remove(0);
            FoodExtraction {
                food_text: only.food_text,
                meal_time: only.meal_time,
                meal_times: Vec::new(),
                is_definite,
            }
        }
        _ => FoodExtraction {
            food_text: clean_phrase(text),
            meal_time: segments[0].meal_time,
            meal_times: segments,
            is_definite,
        },
    };
    if extraction.food_text.is_empty() {
        return None;
    }

    let confidence = if is_definite {
        TRIGGER_CONFIDENCE
    } else {
        RECORD_MODE_CONFIDENCE
    };
    Some((extraction, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_and_trigger() {
        let (food, conf) = detect_food("ラーメンを食べた", false).unwrap();
        assert_eq!(food.food_text, "ラーメン");
        assert_eq!(food.meal_time, MealTimeSlot::Unspecified);
        assert!(food.is_definite);
        assert_eq!(conf, TRIGGER_CONFIDENCE);
    }

    #[test]
    fn test_bare_keyword_needs_record_mode() {
        assert!(detect_food("ラーメン", false).is_none());
        let (food, conf) = detect_food("ラーメン", true).unwrap();
        assert!(!food.is_definite);
        assert_eq!(conf, RECORD_MODE_CONFIDENCE);
    }

    #[test]
    fn test_marker_is_a_trigger() {
        let (food, _) = detect_food("昼 ラーメン", false).unwrap();
        assert_eq!(food.meal_time, MealTimeSlot::Lunch);
        assert_eq!(food.food_text, "ラーメン");
        assert!(food.is_definite);
    }

    #[test]
    fn test_meal_word_alone_is_not_food() {
        assert!(detect_food("朝ごはん食べた", false).is_none());
    }

    #[test]
    fn test_multiple_slots() {
        let (food, _) = detect_food("朝にパンとコーヒー 昼にカツ丼 夜に納豆", false).unwrap();
        assert_eq!(food.meal_time, MealTimeSlot::Breakfast);
        let slots: Vec<_> = food.meal_times.iter().map(|m| m.meal_time).collect();
        assert_eq!(
            slots,
            vec![MealTimeSlot::Breakfast, MealTimeSlot::Lunch, MealTimeSlot::Dinner]
        );
    }

    #[test]
    fn test_unknown_food_is_not_food() {
        assert!(detect_food("宇宙食を食べた", false).is_none());
    }
}
