//! Data-entry rules for catalog foods, pets and schedules.
//!
//! Anything rejected here would otherwise have to be excluded at analysis
//! time; see `DryMatterProfile::from_food` for that fallback.

use std::collections::HashSet;

use super::types::{FoodNutrients, GoalOverrides, MealSlot};

const MAX_WEIGHT_KG: f64 = 500.0;

pub fn validate_food(food: &FoodNutrients) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    let mut pct = |name: &str, value: Option<f64>| {
        if let Some(v) = value {
            if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                problems.push(format!("{name} must be between 0 and 100"));
            }
        }
    };
    pct("moisture_pct", Some(food.moisture_pct));
    pct("protein_pct", Some(food.protein_pct));
    pct("fat_pct", Some(food.fat_pct));
    pct("fiber_pct", Some(food.fiber_pct));
    pct("carbohydrate_pct", food.carbohydrate_pct);
    pct("ash_pct", food.ash_pct);

    if food.moisture_pct >= 100.0 {
        problems.push("moisture_pct must be below 100".to_owned());
    }

    let carbohydrate = food.carbohydrate_pct.unwrap_or(0.0);
    if food.protein_pct + food.fat_pct + carbohydrate > 100.0 {
        problems.push("protein, fat and carbohydrate exceed 100%".to_owned());
    }

    let composition = food.moisture_pct
        + food.protein_pct
        + food.fat_pct
        + food.fiber_pct
        + carbohydrate
        + food.ash_pct.unwrap_or(0.0);
    if composition > 100.0 {
        problems.push(format!(
            "moisture and nutrients add up to {composition:.1}%, more than the whole food"
        ));
    }

    if let Some(grams) = food.serving_size_grams {
        if !grams.is_finite() || grams <= 0.0 {
            problems.push("serving_size_grams must be positive".to_owned());
        }
    }
    if let Some(kcal) = food.calories_per_100g {
        if !kcal.is_finite() || kcal < 0.0 || kcal > 900.0 {
            problems.push("calories_per_100g must be between 0 and 900".to_owned());
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

pub fn validate_pet(name: &str, weight_kg: f64, goals: &GoalOverrides) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();
    if name.trim().is_empty() {
        problems.push("name is required".to_owned());
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 || weight_kg > MAX_WEIGHT_KG {
        problems.push(format!("weight_kg must be in (0, {MAX_WEIGHT_KG}]"));
    }
    for (field, value) in [
        ("calories_kcal", goals.calories_kcal),
        ("protein_g", goals.protein_g),
        ("fat_g", goals.fat_g),
        ("fiber_g", goals.fiber_g),
    ] {
        if matches!(value, Some(v) if !v.is_finite() || v <= 0.0) {
            problems.push(format!("goal {field} must be positive"));
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

pub fn validate_feeding(
    meal_number: i32,
    served_grams: f64,
    eaten_grams: Option<f64>,
) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();
    if meal_number < 1 {
        problems.push("meal_number must be at least 1".to_owned());
    }
    if !served_grams.is_finite() || served_grams <= 0.0 {
        problems.push("amount_served_grams must be positive".to_owned());
    }
    if let Some(eaten) = eaten_grams {
        if !eaten.is_finite() || eaten < 0.0 {
            problems.push("amount_eaten_grams must not be negative".to_owned());
        } else if eaten > served_grams {
            problems.push("amount_eaten_grams cannot exceed amount_served_grams".to_owned());
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

pub fn validate_schedule(slots: &[MealSlot]) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();
    for slot in slots {
        if slot.meal_number < 1 {
            problems.push(format!("meal_number {} must be at least 1", slot.meal_number));
        }
        if !seen.insert(slot.meal_number) {
            problems.push(format!("meal_number {} appears twice", slot.meal_number));
        }
        if !slot.expected_grams.is_finite() || slot.expected_grams <= 0.0 {
            problems.push(format!(
                "meal {} expected_grams must be positive",
                slot.meal_number
            ));
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::types::FoodType;

    fn wet(moisture: f64, protein: f64) -> FoodNutrients {
        FoodNutrients {
            food_type: FoodType::Wet,
            moisture_pct: moisture,
            protein_pct: protein,
            fat_pct: 5.0,
            fiber_pct: 1.0,
            carbohydrate_pct: None,
            ash_pct: None,
            serving_size_grams: Some(85.0),
            calories_per_100g: None,
        }
    }

    #[test]
    fn accepts_typical_wet_food() {
        assert!(validate_food(&wet(78.0, 11.0)).is_ok());
    }

    #[test]
    fn rejects_food_heavier_than_itself_on_dry_matter() {
        // 30 % protein at 75 % moisture would be 120 % protein dry matter.
        let problems = validate_food(&wet(75.0, 30.0)).unwrap_err();
        assert!(problems.iter().any(|p| p.contains("more than the whole food")));
    }

    #[test]
    fn rejects_full_moisture_and_macro_overflow() {
        assert!(validate_food(&wet(100.0, 0.0)).is_err());

        let mut food = wet(5.0, 50.0);
        food.fat_pct = 30.0;
        food.carbohydrate_pct = Some(30.0);
        let problems = validate_food(&food).unwrap_err();
        assert!(problems.iter().any(|p| p.contains("exceed 100%")));
    }

    #[test]
    fn rejects_negative_percentages() {
        let mut food = wet(70.0, 10.0);
        food.fat_pct = -1.0;
        assert!(validate_food(&food).is_err());
    }

    #[test]
    fn feeding_eaten_cannot_exceed_served() {
        assert!(validate_feeding(1, 100.0, Some(80.0)).is_ok());
        assert!(validate_feeding(1, 100.0, None).is_ok());
        assert!(validate_feeding(1, 100.0, Some(120.0)).is_err());
        assert!(validate_feeding(0, 100.0, None).is_err());
        assert!(validate_feeding(1, 0.0, None).is_err());
    }

    #[test]
    fn pet_rules() {
        assert!(validate_pet("Rex", 10.0, &GoalOverrides::default()).is_ok());
        assert!(validate_pet(" ", 10.0, &GoalOverrides::default()).is_err());
        assert!(validate_pet("Rex", 0.0, &GoalOverrides::default()).is_err());
        let goals = GoalOverrides {
            protein_g: Some(-4.0),
            ..GoalOverrides::default()
        };
        assert!(validate_pet("Rex", 10.0, &goals).is_err());
    }

    #[test]
    fn schedule_needs_unique_positive_slots() {
        let slot = |n, g| MealSlot {
            meal_number: n,
            label: None,
            expected_grams: g,
        };
        assert!(validate_schedule(&[slot(1, 100.0), slot(2, 80.0)]).is_ok());
        assert!(validate_schedule(&[slot(1, 100.0), slot(1, 80.0)]).is_err());
        assert!(validate_schedule(&[slot(1, 0.0)]).is_err());
    }
}
