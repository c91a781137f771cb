//! Multi-Entity Splitter.
//!
//! Turns one classification into one entity per record, in the order the
//! records appear in the message. Generative output is re-ordered by text
//! position. When the model collapsed several meals or activities into one,
//! the deterministic marker split is used instead.

use once_cell::sync::Lazy;
use regex::Regex;

use healthlog_catalog::{match_exercise, parse_portion};
use healthlog_core::text::{fold_width, is_hiragana};
use healthlog_core::{
    Classification, ExerciseMention, Extraction, FoodExtraction, FoodGroup, FoodMention,
    MealTimeSlot, MealTimeText, WeightMention,
};

use crate::fallback::exercise::{distinct_activities, find_activities, parse_exercises};
use crate::markers::{clean_phrase, distinct_slots, ends_with_food, find_meal_markers, slice_by_markers};

static QUANTITY_ONLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+(?:\.\d+)?\s*(?:グラム|切れ|人前|g|ｇ|個|枚|杯|本|皿|玉|貫)$").unwrap()
});

/// Item separators other than `と`.
const SEPARATORS: &[&str] = &["及び", "、", "，", ",", "＋", "+", "＆", "&", "・"];

/// One record-to-be.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Weight(WeightMention),
    Food(FoodGroup),
    Exercise(ExerciseMention),
}

pub fn split(classification: &Classification, text: &str) -> Vec<Entity> {
    match &classification.payload {
        Extraction::Weight(w) => vec![Entity::Weight(w.clone())],
        Extraction::Food(food) => split_food(food, text).into_iter().map(Entity::Food).collect(),
        Extraction::Exercise(multi) => split_exercises(&multi.exercises, text)
            .into_iter()
            .map(Entity::Exercise)
            .collect(),
        Extraction::None => Vec::new(),
    }
}

pub fn split_food(food: &FoodExtraction, text: &str) -> Vec<FoodGroup> {
    let pairs = if food.meal_times.len() >= 2 {
        order_by_marker(food.meal_times.clone(), text)
    } else {
        let single = food.meal_times.first().cloned().unwrap_or_else(|| MealTimeText {
            meal_time: food.meal_time,
            food_text: food.food_text.clone(),
        });
        if distinct_slots(&find_meal_markers(text)) >= 2 {
            let sliced = slice_by_markers(text);
            if sliced.len() >= 2 {
                sliced
            } else {
                vec![single]
            }
        } else {
            vec![single]
        }
    };

    pairs
        .into_iter()
        .filter_map(|pair| {
            let food_text = clean_phrase(&pair.food_text);
            let items = split_items(&food_text, pair.meal_time);
            (!items.is_empty()).then_some(FoodGroup {
                meal_time: pair.meal_time,
                food_text,
                items,
            })
        })
        .collect()
}

pub fn split_exercises(exercises: &[ExerciseMention], text: &str) -> Vec<ExerciseMention> {
    if exercises.len() >= 2 {
        return order_by_position(exercises.to_vec(), text, |m| m.name.as_str());
    }
    let folded = fold_width(text);
    if distinct_activities(&find_activities(&folded)) >= 2 {
        let parsed = parse_exercises(&folded);
        if parsed.len() >= 2 {
            return parsed;
        }
    }
    exercises.to_vec()
}

/// Split a meal's food text into items on separators.
pub fn split_items(food_text: &str, meal_time: MealTimeSlot) -> Vec<FoodMention> {
    let mut pieces: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    while pos < food_text.len() {
        let rest = &food_text[pos..];
        let Some(c) = rest.chars().next() else { break };
        let sep_len = if c.is_whitespace() {
            c.len_utf8()
        } else if let Some(sep) = SEPARATORS.iter().find(|s| rest.starts_with(*s)) {
            sep.len()
        } else if c == 'と' && is_item_and(food_text, pos) {
            c.len_utf8()
        } else {
            0
        };

        if sep_len > 0 {
            pieces.push(&food_text[start..pos]);
            pos += sep_len;
            start = pos;
        } else {
            pos += c.len_utf8();
        }
    }
    pieces.push(&food_text[start..]);

    // `餃子 5個`: a bare quantity belongs to the item before it
    let mut spans: Vec<String> = Vec::new();
    for piece in pieces.into_iter().map(str::trim).filter(|p| !p.is_empty()) {
        match spans.last_mut() {
            Some(prev) if QUANTITY_ONLY_RE.is_match(piece) => {
                prev.push(' ');
                prev.push_str(piece);
            }
            _ => spans.push(piece.to_string()),
        }
    }

    spans
        .into_iter()
        .filter_map(|raw_text| {
            let display_text = clean_phrase(&raw_text);
            if display_text.is_empty() {
                return None;
            }
            let (base_name, portion_text) = parse_portion(&display_text);
            Some(FoodMention {
                raw_text,
                display_text,
                base_name,
                portion_text,
                meal_time,
            })
        })
        .collect()
}

/// `と` joins items when the text before it ends a word: a non-hiragana
/// character (`パンとコーヒー`) or a catalog keyword (`いちごとバナナ`).
fn is_item_and(text: &str, pos: usize) -> bool {
    let before = &text[..pos];
    let after = &text[pos + 'と'.len_utf8()..];
    let Some(prev) = before.chars().next_back() else {
        return false;
    };
    if after.trim().is_empty() {
        return false;
    }
    !is_hiragana(prev) || ends_with_food(before)
}

/// Stable sort by the meal-time marker each group belongs to. Each marker is
/// claimed once, so `朝に納豆 夜に納豆` orders by slot even though both
/// groups name the same food. Groups without a marker fall back to where
/// their food text appears.
fn order_by_marker(pairs: Vec<MealTimeText>, text: &str) -> Vec<MealTimeText> {
    let markers = find_meal_markers(text);
    let mut claimed = vec![false; markers.len()];
    let mut keyed: Vec<(usize, MealTimeText)> = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let hit = (0..markers.len()).find(|&i| !claimed[i] && markers[i].slot == pair.meal_time);
        let pos = match hit {
            Some(i) => {
                claimed[i] = true;
                markers[i].start
            }
            None => position_in(text, &pair.food_text).unwrap_or(usize::MAX),
        };
        keyed.push((pos, pair));
    }
    keyed.sort_by_key(|(pos, _)| *pos);
    keyed.into_iter().map(|(_, pair)| pair).collect()
}

/// Stable sort by where each entry's text first appears. Entries not found
/// keep their relative order after the found ones.
fn order_by_position<T>(items: Vec<T>, text: &str, key: impl Fn(&T) -> &str) -> Vec<T> {
    let mut keyed: Vec<(usize, T)> = items
        .into_iter()
        .map(|item| (position_in(text, key(&item)).unwrap_or(usize::MAX), item))
        .collect();
    keyed.sort_by_key(|(pos, _)| *pos);
    keyed.into_iter().map(|(_, item)| item).collect()
}

fn position_in(text: &str, needle: &str) -> Option<usize> {
    let needle = needle.trim();
    if needle.is_empty() {
        return None;
    }
    if let Some(pos) = text.find(needle) {
        return Some(pos);
    }
    // canonical names (`腕立て伏せ`) may be written abbreviated (`腕立て`)
    match_exercise(needle).and_then(|hit| {
        hit.entry
            .keywords
            .iter()
            .filter_map(|kw| text.find(kw))
            .min()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthlog_core::{ExerciseCategory, MultiExerciseExtraction};

    use crate::fallback::FallbackExtractor;
    use healthlog_core::ExtractHint;

    fn texts(groups: &[FoodGroup]) -> Vec<(MealTimeSlot, String)> {
        groups
            .iter()
            .map(|g| (g.meal_time, g.food_text.clone()))
            .collect()
    }

    #[test]
    fn test_three_meals_scenario() {
        let text = "朝にパンとコーヒー 昼にカツ丼 夜に納豆";
        let c = FallbackExtractor::default().classify_and_extract(text, ExtractHint::default());
        let Extraction::Food(food) = &c.payload else {
            panic!("expected food, got {:?}", c.payload);
        };
        let groups = split_food(food, text);
        assert_eq!(
            texts(&groups),
            vec![
                (MealTimeSlot::Breakfast, "パンとコーヒー".to_string()),
                (MealTimeSlot::Lunch, "カツ丼".to_string()),
                (MealTimeSlot::Dinner, "納豆".to_string()),
            ]
        );
        let names: Vec<_> = groups[0].items.iter().map(|i| i.base_name.as_str()).collect();
        assert_eq!(names, vec!["パン", "コーヒー"]);
    }

    #[test]
    fn test_model_groups_reordered_by_position() {
        let text = "朝にパンとコーヒー 昼にカツ丼 夜に納豆";
        let food = FoodExtraction {
            food_text: text.to_string(),
            meal_time: MealTimeSlot::Dinner,
            meal_times: vec![
                MealTimeText {
                    meal_time: MealTimeSlot::Dinner,
                    food_text: "納豆".to_string(),
                },
                MealTimeText {
                    meal_time: MealTimeSlot::Breakfast,
                    food_text: "パンとコーヒー".to_string(),
                },
                MealTimeText {
                    meal_time: MealTimeSlot::Lunch,
                    food_text: "カツ丼".to_string(),
                },
            ],
            is_definite: true,
        };
        let slots: Vec<_> = split_food(&food, text).iter().map(|g| g.meal_time).collect();
        assert_eq!(
            slots,
            vec![MealTimeSlot::Breakfast, MealTimeSlot::Lunch, MealTimeSlot::Dinner]
        );
    }

    #[test]
    fn test_same_food_in_two_meals_follows_markers() {
        let text = "朝に納豆 夜に納豆";
        let food = FoodExtraction {
            food_text: String::new(),
            meal_time: MealTimeSlot::Unspecified,
            meal_times: vec![
                MealTimeText {
                    meal_time: MealTimeSlot::Dinner,
                    food_text: "納豆".to_string(),
                },
                MealTimeText {
                    meal_time: MealTimeSlot::Breakfast,
                    food_text: "納豆".to_string(),
                },
            ],
            is_definite: true,
        };
        let slots: Vec<_> = split_food(&food, text).iter().map(|g| g.meal_time).collect();
        assert_eq!(slots, vec![MealTimeSlot::Breakfast, MealTimeSlot::Dinner]);
    }

    #[test]
    fn test_collapsed_model_group_is_resplit() {
        let text = "朝にパン 夜に納豆";
        let food = FoodExtraction {
            food_text: "パン 納豆".to_string(),
            meal_time: MealTimeSlot::Unspecified,
            meal_times: Vec::new(),
            is_definite: true,
        };
        let groups = split_food(&food, text);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].meal_time, MealTimeSlot::Dinner);
    }

    #[test]
    fn test_single_slot_keeps_slot() {
        let food = FoodExtraction {
            food_text: "ラーメン".to_string(),
            meal_time: MealTimeSlot::Lunch,
            meal_times: Vec::new(),
            is_definite: true,
        };
        let groups = split_food(&food, "昼 ラーメン");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].meal_time, MealTimeSlot::Lunch);
    }

    #[test]
    fn test_item_separators() {
        let items = split_items("ご飯、味噌汁＋納豆 卵焼き", MealTimeSlot::Breakfast);
        let names: Vec<_> = items.iter().map(|i| i.base_name.as_str()).collect();
        assert_eq!(names, vec!["ご飯", "味噌汁", "納豆", "卵焼き"]);
    }

    #[test]
    fn test_to_only_splits_at_word_ends() {
        let names = |t: &str| -> Vec<String> {
            split_items(t, MealTimeSlot::Unspecified)
                .into_iter()
                .map(|i| i.base_name)
                .collect()
        };
        assert_eq!(names("いちごとバナナ"), vec!["いちご", "バナナ"]);
        assert_eq!(names("トマトと卵"), vec!["トマト", "卵"]);
        assert_eq!(names("とんかつ"), vec!["とんかつ"]);
    }

    #[test]
    fn test_portion_is_kept_verbatim() {
        let items = split_items("餃子 5個とビール2杯", MealTimeSlot::Dinner);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].display_text, "餃子 5個");
        assert_eq!(items[0].base_name, "餃子");
        assert_eq!(items[0].portion_text.as_deref(), Some("5個"));
        assert_eq!(items[1].portion_text.as_deref(), Some("2杯"));
    }

    #[test]
    fn test_model_exercises_reordered() {
        let text = "腕立て20回とランニング30分";
        let mut run = ExerciseMention::new(ExerciseCategory::Cardio, "ランニング");
        run.duration_minutes = Some(30.0);
        let mut push = ExerciseMention::new(ExerciseCategory::Strength, "腕立て伏せ");
        push.reps = Some(20);
        let ordered = split_exercises(&[run, push], text);
        assert_eq!(ordered[0].name, "腕立て伏せ");
        assert_eq!(ordered[1].name, "ランニング");
    }

    #[test]
    fn test_collapsed_exercise_is_resplit() {
        let text = "ランニング30分、スクワット20回";
        let c = Classification {
            confidence: 0.9,
            payload: Extraction::Exercise(MultiExerciseExtraction {
                exercises: vec![ExerciseMention::new(ExerciseCategory::Cardio, "ランニング")],
            }),
        };
        let entities = split(&c, text);
        assert_eq!(entities.len(), 2);
        let Entity::Exercise(squats) = &entities[1] else {
            panic!("expected exercise");
        };
        assert_eq!(squats.reps, Some(20));
    }

    #[test]
    fn test_none_yields_nothing() {
        assert!(split(&Classification::none(0.0), "こんにちは").is_empty());
    }
}
