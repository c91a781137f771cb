//! Meal-time markers and the phrase cleanup shared by both split paths.

use healthlog_catalog::food::food_keywords_longest_first;
use healthlog_core::{MealTimeSlot, MealTimeText};

/// Marker words, longest first within each slot so that `朝ごはん` wins over `朝`.
const MEAL_MARKERS: &[(&str, MealTimeSlot)] = &[
    ("朝ごはん", MealTimeSlot::Breakfast),
    ("朝ご飯", MealTimeSlot::Breakfast),
    ("あさごはん", MealTimeSlot::Breakfast),
    ("朝食", MealTimeSlot::Breakfast),
    ("朝飯", MealTimeSlot::Breakfast),
    ("今朝", MealTimeSlot::Breakfast),
    ("朝", MealTimeSlot::Breakfast),
    ("昼ごはん", MealTimeSlot::Lunch),
    ("昼ご飯", MealTimeSlot::Lunch),
    ("ひるごはん", MealTimeSlot::Lunch),
    ("お昼", MealTimeSlot::Lunch),
    ("昼食", MealTimeSlot::Lunch),
    ("昼飯", MealTimeSlot::Lunch),
    ("ランチ", MealTimeSlot::Lunch),
    ("昼", MealTimeSlot::Lunch),
    ("晩ごはん", MealTimeSlot::Dinner),
    ("晩ご飯", MealTimeSlot::Dinner),
    ("晩御飯", MealTimeSlot::Dinner),
    ("夜ごはん", MealTimeSlot::Dinner),
    ("夜ご飯", MealTimeSlot::Dinner),
    ("よるごはん", MealTimeSlot::Dinner),
    ("ばんごはん", MealTimeSlot::Dinner),
    ("夕ごはん", MealTimeSlot::Dinner),
    ("夕ご飯", MealTimeSlot::Dinner),
    ("ディナー", MealTimeSlot::Dinner),
    ("夕食", MealTimeSlot::Dinner),
    ("夕飯", MealTimeSlot::Dinner),
    ("晩飯", MealTimeSlot::Dinner),
    ("今夜", MealTimeSlot::Dinner),
    ("今晩", MealTimeSlot::Dinner),
    ("夜", MealTimeSlot::Dinner),
    ("晩", MealTimeSlot::Dinner),
    ("間食", MealTimeSlot::Snack),
    ("おやつ", MealTimeSlot::Snack),
];

const LEADING_FILLER: &[&str] = &["今日は", "今日の", "今日", "きょうは", "きょう", "さっき", "、", "，", ","];

/// Single-kana particles. Only stripped when they are not the edge of a food
/// name (`はむ`, `いちご`).
const PARTICLES: &[&str] = &["に", "は", "で", "の", "も", "を"];

/// Recording verbs and filler, stripped from the end of a food phrase.
pub const FOOD_TRIGGERS: &[&str] = &[
    "を食べました", "を食べた", "食べました", "食べた", "たべた", "を飲みました", "を飲んだ", "飲みました",
    "飲んだ", "のんだ", "を摂取した", "摂取した", "摂取", "いただきました", "完食", "を記録して", "記録して",
    "を記録", "記録", "きろく",
];

const TRAILING_FILLER: &[&str] = &[
    "でした", "です", "だった", "だけ", "から", "。", "！", "!", "、", "，", ",",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerHit {
    pub slot: MealTimeSlot,
    pub keyword: &'static str,
    /// Byte range in the scanned text.
    pub start: usize,
    pub end: usize,
}

/// Left-to-right scan for meal-time markers. Hits never overlap.
pub fn find_meal_markers(text: &str) -> Vec<MarkerHit> {
    let mut hits = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let found = MEAL_MARKERS
            .iter()
            .filter(|(kw, _)| rest.starts_with(kw))
            .max_by_key(|(kw, _)| kw.len());
        match found {
            Some(&(keyword, slot)) => {
                hits.push(MarkerHit {
                    slot,
                    keyword,
                    start: pos,
                    end: pos + keyword.len(),
                });
                pos += keyword.len();
            }
            None => pos += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    hits
}

/// Number of different slots named in the text.
pub fn distinct_slots(hits: &[MarkerHit]) -> usize {
    let mut seen: Vec<MealTimeSlot> = Vec::new();
    for hit in hits {
        if !seen.contains(&hit.slot) {
            seen.push(hit.slot);
        }
    }
    seen.len()
}

/// Slice the text at marker positions. Each marker owns the text up to the
/// next marker. When the first marker has nothing after it (`カツ丼を昼に食べた`),
/// the text before it is used instead. Segments that clean up empty are dropped.
pub fn slice_by_markers(text: &str) -> Vec<MealTimeText> {
    let hits = find_meal_markers(text);
    let mut segments = Vec::with_capacity(hits.len());
    for (i, hit) in hits.iter().enumerate() {
        let end = hits.get(i + 1).map_or(text.len(), |next| next.start);
        let mut food_text = clean_phrase(&text[hit.end..end]);
        if food_text.is_empty() && i == 0 {
            food_text = clean_phrase(&text[..hit.start]);
        }
        if !food_text.is_empty() {
            segments.push(MealTimeText {
                meal_time: hit.slot,
                food_text,
            });
        }
    }
    segments
}

/// Strip leading particles and filler and trailing triggers, repeatedly.
pub fn clean_phrase(text: &str) -> String {
    let mut s = text.trim();
    loop {
        let before = s;
        s = strip_leading(s);
        s = strip_trailing(s);
        if s == before {
            return s.to_string();
        }
    }
}

fn strip_leading(s: &str) -> &str {
    for prefix in LEADING_FILLER {
        if let Some(rest) = s.strip_prefix(prefix) {
            return rest.trim_start();
        }
    }
    if starts_with_food(s) {
        return s;
    }
    for prefix in PARTICLES {
        if let Some(rest) = s.strip_prefix(prefix) {
            // a word cannot start with ん or a prolonged-sound mark
            if rest.starts_with(['ん', 'ー']) {
                return s;
            }
            return rest.trim_start();
        }
    }
    s
}

fn strip_trailing(s: &str) -> &str {
    for suffix in FOOD_TRIGGERS.iter().chain(TRAILING_FILLER) {
        if let Some(rest) = s.strip_suffix(suffix) {
            return rest.trim_end();
        }
    }
    if ends_with_food(s) {
        return s;
    }
    for suffix in PARTICLES {
        if let Some(rest) = s.strip_suffix(suffix) {
            return rest.trim_end();
        }
    }
    s
}

fn starts_with_food(s: &str) -> bool {
    food_keywords_longest_first().iter().any(|kw| s.starts_with(kw))
}

pub(crate) fn ends_with_food(s: &str) -> bool {
    food_keywords_longest_first().iter().any(|kw| s.ends_with(kw))
}
