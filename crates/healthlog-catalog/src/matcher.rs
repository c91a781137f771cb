//! Tiered keyword matcher.
//!
//! Tiers are tried strongest first over the whole catalog, so a HIGH hit
//! anywhere beats a MEDIUM hit on an earlier entry. Within a tier the first
//! entry in catalog order wins.

use crate::exercise::EXERCISE_CATALOG;
use crate::food::FOOD_CATALOG;
use crate::types::{CatalogEntry, ExerciseEntry, FoodEntry, MatchResult, MatchTier};

/// Resolve free text to a catalog entry.
pub fn match_entry<'a, E: CatalogEntry>(
    free_text: &str,
    catalog: &'a [E],
) -> Option<MatchResult<'a, E>> {
    let text = free_text.trim();
    if text.is_empty() {
        return None;
    }

    // HIGH: exact keyword equality
    if let Some(hit) = find_in(catalog, MatchTier::High, |kw| kw == text) {
        return Some(hit);
    }

    // MEDIUM: raw containment, either direction
    if let Some(hit) = find_in(catalog, MatchTier::Medium, |kw| {
        text.contains(kw) || kw.contains(text)
    }) {
        return Some(hit);
    }

    // LOW: containment after whitespace removal and lower-casing
    let normalized = normalize(text);
    if normalized.is_empty() {
        return None;
    }
    find_in(catalog, MatchTier::Low, |kw| {
        let kw = normalize(kw);
        !kw.is_empty() && (normalized.contains(&kw) || kw.contains(&normalized))
    })
}

pub fn match_food(free_text: &str) -> Option<MatchResult<'static, FoodEntry>> {
    match_entry(free_text, FOOD_CATALOG)
}

pub fn match_exercise(free_text: &str) -> Option<MatchResult<'static, ExerciseEntry>> {
    match_entry(free_text, EXERCISE_CATALOG)
}

fn find_in<'a, E: CatalogEntry>(
    catalog: &'a [E],
    tier: MatchTier,
    mut predicate: impl FnMut(&str) -> bool,
) -> Option<MatchResult<'a, E>> {
    catalog.iter().enumerate().find_map(|(index, entry)| {
        entry
            .keywords()
            .iter()
            .find(|kw| predicate(kw))
            .map(|&keyword| MatchResult {
                entry,
                tier,
                keyword,
                index,
            })
    })
}

/// Strip all whitespace (including full-width spaces) and lower-case.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_keyword_is_high() {
        let hit = match_food("納豆").unwrap();
        assert_eq!(hit.entry.id, "natto");
        assert_eq!(hit.tier, MatchTier::High);
    }

    #[test]
    fn test_containment_is_medium() {
        let hit = match_food("納豆ご飯大盛り").unwrap();
        assert_eq!(hit.tier, MatchTier::Medium);
        // ご飯 comes first in catalog order
        assert_eq!(hit.entry.id, "rice_white_cooked");
    }

    #[test]
    fn test_high_beats_earlier_medium() {
        // white rice (index 0) contains-matches via "ご飯"
        let hit = match_food("玄米ご飯").unwrap();
        assert_eq!(hit.tier, MatchTier::High);
        assert_eq!(hit.entry.id, "rice_brown_cooked");
    }

    #[test]
    fn test_normalized_is_low() {
        let hit = match_exercise("ヨ ガ").unwrap();
        assert_eq!(hit.tier, MatchTier::Low);
        assert_eq!(hit.entry.id, "yoga");

        let hit = match_exercise("SUP  ").map(|h| h.tier);
        assert_eq!(hit, None);
    }

    #[test]
    fn test_case_folding_only_in_low_tier() {
        let catalog = [FoodEntry {
            id: "latte",
            name: "Latte",
            category: crate::types::FoodCategory::Beverages,
            kcal_per_100g: 50.0,
            protein_per_100g: 2.0,
            fat_per_100g: 2.0,
            carbs_per_100g: 5.0,
            serving_g: 200.0,
            keywords: &["Latte"],
        }];
        let hit = match_entry("latte", &catalog).unwrap();
        assert_eq!(hit.tier, MatchTier::Low);
        let hit = match_entry("Latte", &catalog).unwrap();
        assert_eq!(hit.tier, MatchTier::High);
    }

    #[test]
    fn test_miss_and_empty() {
        assert!(match_food("宇宙食").is_none());
        assert!(match_food("").is_none());
        assert!(match_food("   ").is_none());
    }

    #[test]
    fn test_deterministic() {
        for text in ["腕立て", "ランニング30分", "ヨ ガ", "謎の運動"] {
            assert_eq!(match_exercise(text), match_exercise(text));
        }
    }

    #[test]
    fn test_abbreviation_resolves_to_canonical_entry() {
        let hit = match_exercise("腕立て").unwrap();
        assert_eq!(hit.entry.name, "腕立て伏せ");
        assert_eq!(hit.tier, MatchTier::High);
    }
}
