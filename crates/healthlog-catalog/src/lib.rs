//! Catalogs: static food and exercise tables with keyword matching.
//!
//! The tables are immutable and shared freely across concurrent callers.
//! Matching is tiered (exact, containment, normalized containment) and
//! always resolves ties in catalog order.

pub mod calories;
pub mod exercise;
pub mod food;
pub mod matcher;
pub mod nutrition;
pub mod types;

pub use calories::{category_default_mets, estimate_calories, CalorieConstants, CalorieInput};
pub use exercise::{exercise_by_id, EXERCISE_CATALOG};
pub use food::{food_by_id, FOOD_CATALOG};
pub use matcher::{match_entry, match_exercise, match_food};
pub use nutrition::{estimate_nutrition, parse_portion, NutritionEstimate, Portion};
pub use types::*;
