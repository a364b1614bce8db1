//! Energy and macro targets.
//!
//! BMR uses the Mifflin-St Jeor equation (1990), scaled by an activity
//! multiplier to get TDEE. The calorie target applies a fixed deficit and the
//! protein target is a fixed g/kg of body weight.

use serde::{Deserialize, Serialize};

use crate::models::ActivityLevel;

/// Daily deficit applied to TDEE (kcal).
pub const CALORIE_DEFICIT: u32 = 400;
/// Protein per kg of body weight (g).
pub const PROTEIN_PER_KG: f64 = 1.6;
/// Step target set when onboarding completes.
pub const DEFAULT_STEP_TARGET: u32 = 8000;
/// Multiplier used when the activity text matches no known level.
const FALLBACK_MULTIPLIER: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyTargets {
    pub tdee: u32,
    pub calorie_target: u32,
    pub protein_target: u32,
}

/// Whether the free-text sex answer selects the male BMR branch.
///
/// Any text containing an `m` counts as male. "feminino" and "female" contain
/// one too and take the male branch; only texts without an `m` get -161.
pub fn is_male(sex: &str) -> bool {
    sex.to_lowercase().contains('m')
}

/// Mifflin-St Jeor basal metabolic rate (kcal/day).
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age: u32, sex: &str) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    if is_male(sex) {
        base + 5.0
    } else {
        base - 161.0
    }
}

/// Multiplier for the activity text, 1.2 when it matches nothing.
pub fn activity_multiplier(activity: &str) -> f64 {
    ActivityLevel::from_text(activity)
        .map(ActivityLevel::multiplier)
        .unwrap_or(FALLBACK_MULTIPLIER)
}

pub fn protein_target(weight_kg: f64) -> u32 {
    (weight_kg * PROTEIN_PER_KG).round() as u32
}

/// Targets from free-text sex and activity answers. Unknown activity text
/// silently uses the sedentary multiplier.
pub fn compute_energy_targets(
    weight_kg: f64,
    height_cm: u32,
    age: u32,
    sex: &str,
    activity: &str,
) -> EnergyTargets {
    energy_targets(weight_kg, height_cm, age, sex, activity_multiplier(activity))
}

/// Same as [`compute_energy_targets`] for an already parsed activity level.
pub fn targets_for_level(
    weight_kg: f64,
    height_cm: u32,
    age: u32,
    sex: &str,
    level: ActivityLevel,
) -> EnergyTargets {
    energy_targets(weight_kg, height_cm, age, sex, level.multiplier())
}

fn energy_targets(
    weight_kg: f64,
    height_cm: u32,
    age: u32,
    sex: &str,
    multiplier: f64,
) -> EnergyTargets {
    let bmr = basal_metabolic_rate(weight_kg, f64::from(height_cm), age, sex);
    let tdee = (bmr * multiplier).round() as u32;

    EnergyTargets {
        tdee,
        calorie_target: tdee.saturating_sub(CALORIE_DEFICIT),
        protein_target: protein_target(weight_kg),
    }
}
