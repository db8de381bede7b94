//! Grams of macros and calories for a given serving.

use serde::Serialize;

use super::config::NutritionConfig;
use super::error::NutritionError;
use super::types::{FoodNutrients, Nutrient};

/// Nutrition delivered by one serving, as-fed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServingNutrition {
    pub grams: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbohydrate_g: f64,
    pub fiber_g: f64,
    pub calories_kcal: f64,
    /// True when calories came from Atwater factors rather than the label.
    pub calories_estimated: bool,
}

/// Carbohydrate as-fed, by difference when the label leaves it out.
pub fn carbohydrate_pct(food: &FoodNutrients, config: &NutritionConfig) -> f64 {
    match food.carbohydrate_pct {
        Some(carb) => carb,
        None => {
            let ash = food
                .ash_pct
                .unwrap_or_else(|| config.ash.for_food_type(food.food_type));
            (100.0 - food.moisture_pct - food.protein_pct - food.fat_pct - food.fiber_pct - ash)
                .max(0.0)
        }
    }
}

/// kcal per 100 g as-fed, and whether it was estimated.
pub fn kcal_per_100g(food: &FoodNutrients, config: &NutritionConfig) -> (f64, bool) {
    match food.calories_per_100g {
        Some(kcal) => (kcal, false),
        None => {
            let f = &config.atwater;
            let kcal = food.protein_pct * f.protein
                + food.fat_pct * f.fat
                + carbohydrate_pct(food, config) * f.carbohydrate;
            (kcal, true)
        }
    }
}

/// As-fed amount of a nutrient per gram of food (g/g, or kcal/g for calories).
pub fn per_gram(food: &FoodNutrients, nutrient: Nutrient, config: &NutritionConfig) -> f64 {
    match nutrient {
        Nutrient::Calories => kcal_per_100g(food, config).0 / 100.0,
        Nutrient::Protein => food.protein_pct / 100.0,
        Nutrient::Fat => food.fat_pct / 100.0,
        Nutrient::Carbohydrate => carbohydrate_pct(food, config) / 100.0,
        Nutrient::Fiber => food.fiber_pct / 100.0,
    }
}

pub fn for_serving(
    food: &FoodNutrients,
    grams: f64,
    config: &NutritionConfig,
) -> Result<ServingNutrition, NutritionError> {
    if !grams.is_finite() || grams < 0.0 {
        return Err(NutritionError::InvalidNutrientData(format!(
            "serving of {grams} g"
        )));
    }
    if !(0.0..100.0).contains(&food.moisture_pct) {
        return Err(NutritionError::Uncomparable {
            moisture_pct: food.moisture_pct,
        });
    }

    let (kcal_100g, calories_estimated) = kcal_per_100g(food, config);
    let scale = grams / 100.0;
    Ok(ServingNutrition {
        grams,
        protein_g: food.protein_pct * scale,
        fat_g: food.fat_pct * scale,
        carbohydrate_g: carbohydrate_pct(food, config) * scale,
        fiber_g: food.fiber_pct * scale,
        calories_kcal: kcal_100g * scale,
        calories_estimated,
    })
}

/// Nutrition for the food's labelled serving size, if it has one.
pub fn for_default_serving(
    food: &FoodNutrients,
    config: &NutritionConfig,
) -> Option<Result<ServingNutrition, NutritionError>> {
    food.serving_size_grams
        .map(|grams| for_serving(food, grams, config))
}
