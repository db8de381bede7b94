//! Constants used by the nutrition engine.
//!
//! Every calculator takes a `&NutritionConfig` so tests can swap in known
//! values. `Default` carries the values the service runs with.

use serde::{Deserialize, Serialize};

use super::types::{ActivityLevel, FoodType, LifeStage, Nutrient, Species};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionConfig {
    pub atwater: AtwaterFactors,
    pub ash: AshDefaults,
    pub life_stage: LifeStageMultipliers,
    pub dog: SpeciesTargets,
    pub cat: SpeciesTargets,
    pub bird: SpeciesTargets,
    pub rabbit: SpeciesTargets,
    /// Used for `Species::Other`; results are flagged approximate.
    pub generic_mammal: SpeciesTargets,
    /// Half-width of every daily target range, as a fraction of the point target.
    pub target_band: f64,
    pub score_caps: ScoreCaps,
    /// Meal balance on-target band, as a fraction of the expected amount.
    pub meal_tolerance: f64,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            atwater: AtwaterFactors::default(),
            ash: AshDefaults::default(),
            life_stage: LifeStageMultipliers::default(),
            dog: SpeciesTargets {
                rer_coefficient: 70.0,
                activity: ActivityMultipliers {
                    low: 1.2,
                    moderate: 1.6,
                    high: 2.0,
                },
                adult_protein_pct: PctRange::new(25.0, 35.0),
                growth_protein_pct: PctRange::new(28.0, 40.0),
                fat_pct: PctRange::new(25.0, 45.0),
                fiber_g_per_1000kcal: PctRange::new(5.0, 15.0),
            },
            cat: SpeciesTargets {
                rer_coefficient: 70.0,
                activity: ActivityMultipliers {
                    low: 1.0,
                    moderate: 1.2,
                    high: 1.4,
                },
                adult_protein_pct: PctRange::new(35.0, 50.0),
                growth_protein_pct: PctRange::new(38.0, 55.0),
                fat_pct: PctRange::new(30.0, 50.0),
                fiber_g_per_1000kcal: PctRange::new(3.0, 12.0),
            },
            bird: SpeciesTargets {
                rer_coefficient: 78.0,
                activity: ActivityMultipliers {
                    low: 1.3,
                    moderate: 1.5,
                    high: 1.8,
                },
                adult_protein_pct: PctRange::new(12.0, 20.0),
                growth_protein_pct: PctRange::new(18.0, 25.0),
                fat_pct: PctRange::new(8.0, 20.0),
                fiber_g_per_1000kcal: PctRange::new(8.0, 25.0),
            },
            rabbit: SpeciesTargets {
                rer_coefficient: 70.0,
                activity: ActivityMultipliers {
                    low: 1.3,
                    moderate: 1.5,
                    high: 1.8,
                },
                adult_protein_pct: PctRange::new(12.0, 18.0),
                growth_protein_pct: PctRange::new(16.0, 22.0),
                fat_pct: PctRange::new(5.0, 12.0),
                fiber_g_per_1000kcal: PctRange::new(60.0, 120.0),
            },
            generic_mammal: SpeciesTargets {
                rer_coefficient: 70.0,
                activity: ActivityMultipliers {
                    low: 1.2,
                    moderate: 1.4,
                    high: 1.8,
                },
                adult_protein_pct: PctRange::new(18.0, 35.0),
                growth_protein_pct: PctRange::new(22.0, 40.0),
                fat_pct: PctRange::new(10.0, 40.0),
                fiber_g_per_1000kcal: PctRange::new(5.0, 30.0),
            },
            target_band: 0.10,
            score_caps: ScoreCaps::default(),
            meal_tolerance: 0.10,
        }
    }
}

impl NutritionConfig {
    /// Species table plus whether it is the generic fallback.
    pub fn species_targets(&self, species: Species) -> (&SpeciesTargets, bool) {
        match species {
            Species::Dog => (&self.dog, false),
            Species::Cat => (&self.cat, false),
            Species::Bird => (&self.bird, false),
            Species::Rabbit => (&self.rabbit, false),
            Species::Other => (&self.generic_mammal, true),
        }
    }
}

/// kcal per gram of each energy-bearing macro. Modified Atwater values by default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtwaterFactors {
    pub protein: f64,
    pub fat: f64,
    pub carbohydrate: f64,
}

impl Default for AtwaterFactors {
    fn default() -> Self {
        Self {
            protein: 3.5,
            fat: 8.5,
            carbohydrate: 3.5,
        }
    }
}

/// Assumed ash percentage (as-fed) when a label omits it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AshDefaults {
    pub dry: f64,
    pub wet: f64,
    pub raw: f64,
    pub homemade: f64,
    pub treat: f64,
    pub supplement: f64,
}

impl Default for AshDefaults {
    fn default() -> Self {
        Self {
            dry: 7.0,
            wet: 2.5,
            raw: 3.0,
            homemade: 2.0,
            treat: 5.0,
            supplement: 10.0,
        }
    }
}

impl AshDefaults {
    pub fn for_food_type(&self, food_type: FoodType) -> f64 {
        match food_type {
            FoodType::Dry => self.dry,
            FoodType::Wet => self.wet,
            FoodType::Raw => self.raw,
            FoodType::Homemade => self.homemade,
            FoodType::Treat => self.treat,
            FoodType::Supplement => self.supplement,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LifeStageMultipliers {
    pub young: f64,
    pub adult: f64,
    pub senior: f64,
    pub reproductive: f64,
}

impl Default for LifeStageMultipliers {
    fn default() -> Self {
        Self {
            young: 2.0,
            adult: 1.0,
            senior: 0.8,
            reproductive: 1.8,
        }
    }
}

impl LifeStageMultipliers {
    pub fn for_stage(&self, stage: LifeStage) -> f64 {
        match stage {
            LifeStage::Young => self.young,
            LifeStage::Adult => self.adult,
            LifeStage::Senior => self.senior,
            LifeStage::Reproductive => self.reproductive,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActivityMultipliers {
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
}

impl ActivityMultipliers {
    pub fn for_level(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Low => self.low,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::High => self.high,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PctRange {
    pub min: f64,
    pub max: f64,
}

impl PctRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Per-species requirement table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesTargets {
    /// RER = coefficient × weight_kg^0.75
    pub rer_coefficient: f64,
    pub activity: ActivityMultipliers,
    /// Protein as % of daily calories.
    pub adult_protein_pct: PctRange,
    pub growth_protein_pct: PctRange,
    /// Fat as % of daily calories.
    pub fat_pct: PctRange,
    pub fiber_g_per_1000kcal: PctRange,
}

/// Upper bounds applied to dry-matter values before scoring, so a
/// protein-extreme food cannot run away with the ranking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreCaps {
    pub protein_pct: f64,
    pub fat_pct: f64,
    pub carbohydrate_pct: f64,
    pub fiber_pct: f64,
    pub kcal_per_100g: f64,
}

impl Default for ScoreCaps {
    fn default() -> Self {
        Self {
            protein_pct: 60.0,
            fat_pct: 40.0,
            carbohydrate_pct: 70.0,
            fiber_pct: 20.0,
            kcal_per_100g: 600.0,
        }
    }
}

impl ScoreCaps {
    pub fn for_nutrient(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.kcal_per_100g,
            Nutrient::Protein => self.protein_pct,
            Nutrient::Fat => self.fat_pct,
            Nutrient::Carbohydrate => self.carbohydrate_pct,
            Nutrient::Fiber => self.fiber_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_species_uses_generic_table() {
        let config = NutritionConfig::default();
        let (_, fallback) = config.species_targets(Species::Dog);
        assert!(!fallback);
        let (targets, fallback) = config.species_targets(Species::Other);
        assert!(fallback);
        assert_eq!(targets.rer_coefficient, 70.0);
    }

    #[test]
    fn config_serializes_for_inspection() {
        let json = serde_json::to_value(NutritionConfig::default()).unwrap();
        assert_eq!(json["atwater"]["fat"], 8.5);
        assert_eq!(json["meal_tolerance"], 0.1);
    }
}
