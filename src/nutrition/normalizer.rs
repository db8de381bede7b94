//! As-fed to dry-matter conversion.

use serde::Serialize;

use super::calculator::{carbohydrate_pct, kcal_per_100g};
use super::config::NutritionConfig;
use super::error::NutritionError;
use super::types::{FoodNutrients, Nutrient};

/// Slack for rounding on printed labels.
const PCT_EPSILON: f64 = 1e-6;

/// Converts an as-fed percentage to a dry-matter percentage.
///
/// Returns `None` when there is no dry matter to divide by (moisture at or
/// above 100 %) or the moisture value is out of range.
pub fn to_dry_matter(moisture_pct: f64, nutrient_pct: f64) -> Option<f64> {
    if !moisture_pct.is_finite() || !nutrient_pct.is_finite() {
        return None;
    }
    if !(0.0..100.0).contains(&moisture_pct) {
        return None;
    }
    Some(nutrient_pct / (1.0 - moisture_pct / 100.0))
}

/// A food's composition with the water taken out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DryMatterProfile {
    pub protein_pct: f64,
    pub fat_pct: f64,
    pub carbohydrate_pct: f64,
    pub fiber_pct: f64,
    pub kcal_per_100g: f64,
    pub calories_estimated: bool,
}

impl DryMatterProfile {
    pub fn from_food(food: &FoodNutrients, config: &NutritionConfig) -> Result<Self, NutritionError> {
        let moisture = food.moisture_pct;
        let dm = |pct: f64| {
            to_dry_matter(moisture, pct).ok_or(NutritionError::Uncomparable {
                moisture_pct: moisture,
            })
        };

        let carbohydrate = carbohydrate_pct(food, config);
        let (kcal, calories_estimated) = kcal_per_100g(food, config);

        let profile = Self {
            protein_pct: dm(food.protein_pct)?,
            fat_pct: dm(food.fat_pct)?,
            carbohydrate_pct: dm(carbohydrate)?,
            fiber_pct: dm(food.fiber_pct)?,
            kcal_per_100g: dm(kcal)?,
            calories_estimated,
        };
        profile.check()?;
        Ok(profile)
    }

    /// Dry-matter value for a nutrient: percent for macros, kcal per 100 g DM for calories.
    pub fn value(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.kcal_per_100g,
            Nutrient::Protein => self.protein_pct,
            Nutrient::Fat => self.fat_pct,
            Nutrient::Carbohydrate => self.carbohydrate_pct,
            Nutrient::Fiber => self.fiber_pct,
        }
    }

    fn check(&self) -> Result<(), NutritionError> {
        for (name, value) in [
            ("protein", self.protein_pct),
            ("fat", self.fat_pct),
            ("carbohydrate", self.carbohydrate_pct),
            ("fiber", self.fiber_pct),
        ] {
            if value < 0.0 {
                return Err(NutritionError::InvalidNutrientData(format!(
                    "{name} is negative"
                )));
            }
            if value > 100.0 + PCT_EPSILON {
                return Err(NutritionError::InvalidNutrientData(format!(
                    "{name} is {value:.1}% of dry matter"
                )));
            }
        }
        let macro_sum = self.protein_pct + self.fat_pct + self.carbohydrate_pct;
        if macro_sum > 100.0 + PCT_EPSILON {
            return Err(NutritionError::InvalidNutrientData(format!(
                "macros sum to {macro_sum:.1}% of dry matter"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::types::FoodType;

    fn food(moisture: f64, protein: f64) -> FoodNutrients {
        FoodNutrients {
            food_type: FoodType::Wet,
            moisture_pct: moisture,
            protein_pct: protein,
            fat_pct: 5.0,
            fiber_pct: 1.0,
            carbohydrate_pct: Some(3.0),
            ash_pct: None,
            serving_size_grams: None,
            calories_per_100g: Some(100.0),
        }
    }

    #[test]
    fn converts_wet_food_to_dry_matter() {
        let value = to_dry_matter(78.0, 11.0).unwrap();
        assert!((value - 50.0).abs() < 1e-9);
        assert_eq!(to_dry_matter(0.0, 25.0), Some(25.0));
    }

    #[test]
    fn monotonic_in_moisture() {
        let mut last = 0.0;
        for step in 0..100 {
            let moisture = step as f64 * 0.99;
            let value = to_dry_matter(moisture, 10.0).unwrap();
            assert!(value > last, "not increasing at moisture {moisture}");
            last = value;
        }
    }

    #[test]
    fn full_moisture_is_uncomparable() {
        assert_eq!(to_dry_matter(100.0, 5.0), None);
        assert_eq!(to_dry_matter(120.0, 5.0), None);
        assert_eq!(to_dry_matter(-1.0, 5.0), None);
        assert_eq!(to_dry_matter(f64::NAN, 5.0), None);

        let err = DryMatterProfile::from_food(&food(100.0, 0.0), &NutritionConfig::default())
            .unwrap_err();
        assert!(matches!(err, NutritionError::Uncomparable { .. }));
    }

    #[test]
    fn protein_above_dry_matter_is_rejected() {
        // 30 / (1 - 0.75) = 120 % protein on a dry-matter basis.
        let err = DryMatterProfile::from_food(&food(75.0, 30.0), &NutritionConfig::default())
            .unwrap_err();
        assert!(matches!(err, NutritionError::InvalidNutrientData(_)));
    }

    #[test]
    fn profile_exposes_values_per_nutrient() {
        let profile =
            DryMatterProfile::from_food(&food(80.0, 10.0), &NutritionConfig::default()).unwrap();
        assert!((profile.value(Nutrient::Protein) - 50.0).abs() < 1e-9);
        assert!((profile.value(Nutrient::Calories) - 500.0).abs() < 1e-9);
        assert!(!profile.calories_estimated);
    }
}
