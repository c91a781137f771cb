//! Portion-aware nutrition baseline for food items.

use healthlog_core::text::fold_width;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::FoodEntry;

static PORTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<base>.*?)\s*(?P<portion>(?P<num>\d+(?:\.\d+)?)\s*(?P<unit>グラム|切れ|人前|g|ｇ|個|枚|杯|本|皿|玉|貫))$")
        .unwrap()
});

/// Largest stated gram amount taken at face value.
pub const MAX_PORTION_GRAMS: f64 = 5000.0;

/// Largest stated serving count taken at face value.
pub const MAX_PORTION_COUNT: f64 = 100.0;

/// How much of a food was eaten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Portion {
    Grams(f64),
    /// Number of typical servings (`2個`, `1杯`).
    Count(f64),
    /// Nothing stated.
    Serving,
}

impl Portion {
    pub fn from_text(portion_text: Option<&str>) -> Self {
        let Some(caps) = portion_text.and_then(|t| PORTION_RE.captures(t.trim())) else {
            return Self::Serving;
        };
        let Ok(amount) = fold_width(&caps["num"]).parse::<f64>() else {
            return Self::Serving;
        };
        if !amount.is_finite() || amount <= 0.0 {
            return Self::Serving;
        }
        match &caps["unit"] {
            "g" | "ｇ" | "グラム" => Self::Grams(amount.min(MAX_PORTION_GRAMS)),
            _ => Self::Count(amount.min(MAX_PORTION_COUNT)),
        }
    }

    fn grams(self, entry: &FoodEntry) -> f64 {
        match self {
            Self::Grams(g) => g,
            Self::Count(n) => n * entry.serving_g,
            Self::Serving => entry.serving_g,
        }
    }
}

/// Split a trailing quantity off a food phrase.
///
/// `"餃子5個"` gives `("餃子", Some("5個"))`; a phrase without a recognised
/// unit comes back unchanged.
pub fn parse_portion(text: &str) -> (String, Option<String>) {
    let trimmed = text.trim();
    match PORTION_RE.captures(trimmed) {
        Some(caps) if !caps["base"].trim().is_empty() => (
            caps["base"].trim().to_string(),
            Some(caps["portion"].to_string()),
        ),
        _ => (trimmed.to_string(), None),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionEstimate {
    pub grams: f64,
    pub kcal: u32,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
}

impl NutritionEstimate {
    pub fn zero() -> Self {
        Self {
            grams: 0.0,
            kcal: 0,
            protein_g: 0.0,
            fat_g: 0.0,
            carbs_g: 0.0,
        }
    }

    /// Sum of several estimates, macros re-rounded to 0.1 g.
    pub fn total<'a>(items: impl IntoIterator<Item = &'a NutritionEstimate>) -> Self {
        let sum = items.into_iter().fold(Self::zero(), |acc, n| Self {
            grams: acc.grams + n.grams,
            kcal: acc.kcal.saturating_add(n.kcal),
            protein_g: acc.protein_g + n.protein_g,
            fat_g: acc.fat_g + n.fat_g,
            carbs_g: acc.carbs_g + n.carbs_g,
        });
        Self {
            grams: round1(sum.grams),
            protein_g: round1(sum.protein_g),
            fat_g: round1(sum.fat_g),
            carbs_g: round1(sum.carbs_g),
            ..sum
        }
    }
}

pub fn estimate_nutrition(entry: &FoodEntry, portion: Portion) -> NutritionEstimate {
    let grams = portion.grams(entry);
    let scale = grams / 100.0;
    NutritionEstimate {
        grams: round1(grams),
        kcal: (entry.kcal_per_100g * scale).round().max(0.0) as u32,
        protein_g: round1(entry.protein_per_100g * scale),
        fat_g: round1(entry.fat_per_100g * scale),
        carbs_g: round1(entry.carbs_per_100g * scale),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
