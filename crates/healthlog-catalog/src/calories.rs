//! Calorie Estimator.
//!
//! Pure function of the activity, body weight and what the user reported.
//! Three rules are tried in order: distance, rep volume, METs. The result
//! never drops below [`CalorieConstants::minimum_kcal`].

use healthlog_core::{ExerciseCategory, WeightedSet};

/// kcal = METs × kg × hours × this factor.
pub const MET_FACTOR: f64 = 1.05;
/// Body weight the per-km rates are calibrated for.
pub const REFERENCE_WEIGHT_KG: f64 = 70.0;
/// Per-rep kcal when the exercise has no rate of its own.
pub const DEFAULT_CALORIES_PER_REP: f64 = 2.0;
/// Volume (kg lifted) that doubles the per-rep estimate.
pub const VOLUME_DIVISOR_KG: f64 = 1000.0;
/// Floor for any estimate.
pub const MINIMUM_KCAL: u32 = 50;

/// Tuning values for [`estimate_calories`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalorieConstants {
    pub met_factor: f64,
    pub reference_weight_kg: f64,
    pub default_per_rep: f64,
    pub volume_divisor_kg: f64,
    pub minimum_kcal: u32,
}

impl Default for CalorieConstants {
    fn default() -> Self {
        Self {
            met_factor: MET_FACTOR,
            reference_weight_kg: REFERENCE_WEIGHT_KG,
            default_per_rep: DEFAULT_CALORIES_PER_REP,
            volume_divisor_kg: VOLUME_DIVISOR_KG,
            minimum_kcal: MINIMUM_KCAL,
        }
    }
}

/// Everything the estimator looks at.
#[derive(Debug, Clone, Copy)]
pub struct CalorieInput<'a> {
    pub category: ExerciseCategory,
    pub mets: f64,
    pub body_weight_kg: f64,
    /// Zero when the user gave no duration.
    pub duration_minutes: f64,
    pub distance_km: Option<f64>,
    pub sets: &'a [WeightedSet],
    /// Distance rate of the matched activity at the reference weight.
    pub calories_per_km: Option<f64>,
    /// Per-rep rate of the matched activity.
    pub calories_per_rep: Option<f64>,
}

/// METs for an activity missing from the catalog.
pub fn category_default_mets(category: ExerciseCategory) -> f64 {
    match category {
        ExerciseCategory::Cardio => 6.0,
        ExerciseCategory::Strength => 5.0,
        ExerciseCategory::Flexibility => 2.5,
        ExerciseCategory::Sports => 6.0,
        ExerciseCategory::Water => 6.0,
        ExerciseCategory::Winter => 7.0,
        ExerciseCategory::MartialArts => 7.0,
        ExerciseCategory::Dance => 5.0,
        ExerciseCategory::Daily => 3.0,
    }
}

/// Estimate energy expenditure in whole kcal.
pub fn estimate_calories(input: &CalorieInput<'_>, constants: &CalorieConstants) -> u32 {
    let raw = distance_kcal(input, constants)
        .or_else(|| strength_kcal(input, constants))
        .unwrap_or_else(|| {
            input.mets * input.body_weight_kg * (input.duration_minutes / 60.0) * constants.met_factor
        });

    let rounded = if raw.is_finite() && raw > 0.0 {
        raw.round() as u32
    } else {
        0
    };
    rounded.max(constants.minimum_kcal)
}

fn distance_kcal(input: &CalorieInput<'_>, constants: &CalorieConstants) -> Option<f64> {
    if input.category != ExerciseCategory::Cardio {
        return None;
    }
    let distance = input.distance_km.filter(|d| *d > 0.0)?;
    let rate = input.calories_per_km?;
    Some(distance * rate * (input.body_weight_kg / constants.reference_weight_kg))
}

fn strength_kcal(input: &CalorieInput<'_>, constants: &CalorieConstants) -> Option<f64> {
    if input.category != ExerciseCategory::Strength
        || input.duration_minutes > 0.0
        || !input.sets.iter().any(|s| s.reps > 0)
    {
        return None;
    }
    let (total_reps, total_volume) = input.sets.iter().fold((0.0, 0.0), |(reps, volume), set| {
        let count = f64::from(set.set_count.max(1));
        let set_reps = f64::from(set.reps) * count;
        (reps + set_reps, volume + set.weight_kg.max(0.0) * set_reps)
    });
    let per_rep = input.calories_per_rep.unwrap_or(constants.default_per_rep);
    Some(per_rep * total_reps * (1.0 + total_volume / constants.volume_divisor_kg))
}
