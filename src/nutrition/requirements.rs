//! Daily targets for a pet from species, life stage, weight and activity.

use serde::{Deserialize, Serialize};

use super::config::{NutritionConfig, PctRange};
use super::error::NutritionError;
use super::types::{Nutrient, PetProfile};

/// Inclusive daily range for one nutrient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub low: f64,
    pub high: f64,
}

impl TargetRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// `point` ± `band` × `point`.
    pub fn around(point: f64, band: f64) -> Self {
        Self {
            low: point * (1.0 - band),
            high: point * (1.0 + band),
        }
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementProfile {
    pub rer_kcal: f64,
    /// Maintenance energy: the calorie budget recommendations must respect.
    pub daily_calorie_target: f64,
    pub calories: TargetRange,
    pub protein_g: TargetRange,
    pub fat_g: TargetRange,
    pub fiber_g: TargetRange,
    /// Set when the species had no table and generic defaults were used.
    pub approximate: bool,
}

impl RequirementProfile {
    pub fn range(&self, nutrient: Nutrient) -> Option<TargetRange> {
        match nutrient {
            Nutrient::Calories => Some(self.calories),
            Nutrient::Protein => Some(self.protein_g),
            Nutrient::Fat => Some(self.fat_g),
            Nutrient::Fiber => Some(self.fiber_g),
            Nutrient::Carbohydrate => None,
        }
    }
}

/// Resting energy requirement in kcal/day.
pub fn resting_energy(weight_kg: f64, coefficient: f64) -> f64 {
    coefficient * weight_kg.powf(0.75)
}

pub fn resolve(
    pet: &PetProfile,
    config: &NutritionConfig,
) -> Result<RequirementProfile, NutritionError> {
    if !pet.weight_kg.is_finite() || pet.weight_kg <= 0.0 {
        return Err(NutritionError::InvalidPetData(format!(
            "weight must be positive, got {}",
            pet.weight_kg
        )));
    }

    let (targets, approximate) = config.species_targets(pet.species);
    let band = config.target_band;

    let rer = resting_energy(pet.weight_kg, targets.rer_coefficient);
    let mer = rer
        * targets.activity.for_level(pet.activity_level)
        * config.life_stage.for_stage(pet.life_stage);

    let daily_calorie_target = pet.goals.calories_kcal.unwrap_or(mer);
    let calories = TargetRange::around(daily_calorie_target, band);

    let protein_pct = if pet.life_stage.is_growth() {
        targets.growth_protein_pct
    } else {
        targets.adult_protein_pct
    };

    let protein_g = match pet.goals.protein_g {
        Some(grams) => TargetRange::around(grams, band),
        None => grams_from_calories(calories, protein_pct, config.atwater.protein),
    };
    let fat_g = match pet.goals.fat_g {
        Some(grams) => TargetRange::around(grams, band),
        None => grams_from_calories(calories, targets.fat_pct, config.atwater.fat),
    };
    let fiber_g = match pet.goals.fiber_g {
        Some(grams) => TargetRange::around(grams, band),
        None => TargetRange::new(
            targets.fiber_g_per_1000kcal.min * calories.low / 1000.0,
            targets.fiber_g_per_1000kcal.max * calories.high / 1000.0,
        ),
    };

    Ok(RequirementProfile {
        rer_kcal: rer,
        daily_calorie_target,
        calories,
        protein_g,
        fat_g,
        fiber_g,
        approximate,
    })
}

fn grams_from_calories(calories: TargetRange, pct: PctRange, kcal_per_gram: f64) -> TargetRange {
    TargetRange::new(
        pct.min / 100.0 * calories.low / kcal_per_gram,
        pct.max / 100.0 * calories.high / kcal_per_gram,
    )
}
