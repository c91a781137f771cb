//! Catalog entry and match types.

use healthlog_core::ExerciseCategory;
use serde::{Deserialize, Serialize};

/// Anything that can be matched by keyword.
pub trait CatalogEntry: Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn keywords(&self) -> &'static [&'static str];
}

/// Strength of a keyword match, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchTier {
    /// Exact keyword equality.
    High,
    /// Raw substring containment, either direction.
    Medium,
    /// Containment after whitespace removal and lower-casing.
    Low,
}

/// A catalog hit.
#[derive(Debug)]
pub struct MatchResult<'a, E> {
    pub entry: &'a E,
    pub tier: MatchTier,
    /// Keyword that produced the hit.
    pub keyword: &'static str,
    /// Position of the entry in its catalog.
    pub index: usize,
}

impl<E> Clone for MatchResult<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for MatchResult<'_, E> {}

impl<E> PartialEq for MatchResult<'_, E> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.tier == other.tier && self.keyword == other.keyword
    }
}

impl<E: CatalogEntry> MatchResult<'_, E> {
    /// Owned, serializable form for record drafts.
    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            id: self.entry.id().to_string(),
            name: self.entry.name().to_string(),
            tier: self.tier,
            keyword: self.keyword.to_string(),
        }
    }
}

/// Serializable description of a catalog hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: String,
    pub name: String,
    pub tier: MatchTier,
    pub keyword: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Grains,
    Meat,
    Fish,
    Dairy,
    Vegetables,
    Fruits,
    Sweets,
    Beverages,
    Prepared,
    FastFood,
    Snacks,
    Seasonings,
    Nuts,
    Legumes,
}

/// A food with per-100 g nutrition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub category: FoodCategory,
    pub kcal_per_100g: f64,
    pub protein_per_100g: f64,
    pub fat_per_100g: f64,
    pub carbs_per_100g: f64,
    /// Typical single serving in grams.
    pub serving_g: f64,
    pub keywords: &'static [&'static str],
}

impl CatalogEntry for FoodEntry {
    fn id(&self) -> &'static str {
        self.id
    }
    fn name(&self) -> &'static str {
        self.name
    }
    fn keywords(&self) -> &'static [&'static str] {
        self.keywords
    }
}

/// An activity with its METs value and optional per-unit rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub category: ExerciseCategory,
    pub mets: f64,
    pub keywords: &'static [&'static str],
    /// kcal per km at the 70 kg reference weight (walking, running).
    pub calories_per_km: Option<f64>,
    /// kcal per repetition for rep-counted strength work.
    pub calories_per_rep: Option<f64>,
}

impl CatalogEntry for ExerciseEntry {
    fn id(&self) -> &'static str {
        self.id
    }
    fn name(&self) -> &'static str {
        self.name
    }
    fn keywords(&self) -> &'static [&'static str] {
        self.keywords
    }
}
