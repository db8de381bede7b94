use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

/// Species a pet belongs to. Anything we have no table for parses to `Other`.
/// JSON input goes through `FromStr` so aliases and casing match the text form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Rabbit,
    Other,
}

impl Species {
    pub fn as_str(self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
            Species::Bird => "bird",
            Species::Rabbit => "rabbit",
            Species::Other => "other",
        }
    }
}

impl FromStr for Species {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "dog" | "canine" => Species::Dog,
            "cat" | "feline" => Species::Cat,
            "bird" | "parrot" | "budgie" => Species::Bird,
            "rabbit" | "bunny" => Species::Rabbit,
            _ => Species::Other,
        })
    }
}

impl From<String> for Species {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(species) => species,
            Err(never) => match never {},
        }
    }
}

/// Growth category used to pick requirement targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LifeStage {
    #[serde(alias = "puppy", alias = "kitten", alias = "juvenile")]
    Young,
    Adult,
    Senior,
    #[serde(alias = "pregnant", alias = "lactating")]
    Reproductive,
}

impl LifeStage {
    pub fn as_str(self) -> &'static str {
        match self {
            LifeStage::Young => "young",
            LifeStage::Adult => "adult",
            LifeStage::Senior => "senior",
            LifeStage::Reproductive => "reproductive",
        }
    }

    /// Stages where the growth protein range applies.
    pub fn is_growth(self) -> bool {
        matches!(self, LifeStage::Young | LifeStage::Reproductive)
    }
}

impl FromStr for LifeStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "young" | "puppy" | "kitten" | "juvenile" => Ok(LifeStage::Young),
            "adult" => Ok(LifeStage::Adult),
            "senior" | "geriatric" => Ok(LifeStage::Senior),
            "reproductive" | "pregnant" | "lactating" => Ok(LifeStage::Reproductive),
            other => Err(format!("unknown life stage '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    #[serde(alias = "sedentary")]
    Low,
    Moderate,
    #[serde(alias = "active", alias = "very_active")]
    High,
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Low => "low",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "sedentary" => Ok(ActivityLevel::Low),
            "moderate" | "normal" => Ok(ActivityLevel::Moderate),
            "high" | "active" | "very_active" => Ok(ActivityLevel::High),
            other => Err(format!("unknown activity level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FoodType {
    Dry,
    Wet,
    Raw,
    Homemade,
    Treat,
    Supplement,
}

impl FoodType {
    pub fn as_str(self) -> &'static str {
        match self {
            FoodType::Dry => "dry",
            FoodType::Wet => "wet",
            FoodType::Raw => "raw",
            FoodType::Homemade => "homemade",
            FoodType::Treat => "treat",
            FoodType::Supplement => "supplement",
        }
    }
}

impl FromStr for FoodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dry" | "kibble" => Ok(FoodType::Dry),
            "wet" | "canned" => Ok(FoodType::Wet),
            "raw" => Ok(FoodType::Raw),
            "homemade" => Ok(FoodType::Homemade),
            "treat" => Ok(FoodType::Treat),
            "supplement" => Ok(FoodType::Supplement),
            other => Err(format!("unknown food type '{other}'")),
        }
    }
}

/// Nutrients the engine tracks. Calories are in kcal, everything else in grams.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Calories,
    Protein,
    Fat,
    Carbohydrate,
    Fiber,
}

impl Nutrient {
    /// Nutrients with a daily requirement range, in report order.
    pub const TARGETED: [Nutrient; 4] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Fat,
        Nutrient::Fiber,
    ];

    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            Nutrient::Protein | Nutrient::Fat | Nutrient::Carbohydrate | Nutrient::Fiber => "g",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::Fat => "fat",
            Nutrient::Carbohydrate => "carbohydrate",
            Nutrient::Fiber => "fiber",
        };
        f.write_str(name)
    }
}

/// Guaranteed-analysis data of a food, as-fed basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrients {
    pub food_type: FoodType,
    pub moisture_pct: f64,
    pub protein_pct: f64,
    pub fat_pct: f64,
    pub fiber_pct: f64,
    pub carbohydrate_pct: Option<f64>,
    pub ash_pct: Option<f64>,
    pub serving_size_grams: Option<f64>,
    pub calories_per_100g: Option<f64>,
}

/// Explicit daily goals that replace the computed targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalOverrides {
    pub calories_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetProfile {
    pub species: Species,
    pub life_stage: LifeStage,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goals: GoalOverrides,
}

/// One historical feeding event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingRecord {
    pub food_id: Uuid,
    pub feeding_date: Date,
    pub meal_number: i32,
    pub amount_served_grams: f64,
    pub amount_eaten_grams: Option<f64>,
}

impl FeedingRecord {
    /// Eaten amount is authoritative; served stands in when nothing was recorded.
    pub fn intake_grams(&self) -> f64 {
        self.amount_eaten_grams.unwrap_or(self.amount_served_grams)
    }
}

/// A catalog entry as seen by the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFood {
    pub id: Uuid,
    pub name: String,
    pub nutrients: FoodNutrients,
    pub price_per_kg: Option<f64>,
    /// Empty means suitable for every species.
    pub species: Vec<Species>,
    /// Empty means suitable for every life stage.
    pub life_stages: Vec<LifeStage>,
}

impl CatalogFood {
    pub fn is_suitable_for(&self, species: Species, life_stage: LifeStage) -> bool {
        (self.species.is_empty() || self.species.contains(&species))
            && (self.life_stages.is_empty() || self.life_stages.contains(&life_stage))
    }
}

/// Expected amount for one scheduled meal of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSlot {
    pub meal_number: i32,
    pub label: Option<String>,
    pub expected_grams: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_species_falls_back_to_other() {
        assert_eq!("Dog".parse::<Species>().unwrap(), Species::Dog);
        assert_eq!("ferret".parse::<Species>().unwrap(), Species::Other);
        let parsed: Species = serde_json::from_str("\"hamster\"").unwrap();
        assert_eq!(parsed, Species::Other);
    }

    #[test]
    fn json_species_accepts_aliases_and_casing() {
        for raw in ["\"Dog\"", "\"canine\"", "\" dog \""] {
            let parsed: Species = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, Species::Dog, "{raw}");
        }
        let parsed: Species = serde_json::from_str("\"Parrot\"").unwrap();
        assert_eq!(parsed, Species::Bird);
        assert_eq!(serde_json::to_string(&Species::Cat).unwrap(), "\"cat\"");
    }

    #[test]
    fn life_stage_accepts_aliases() {
        assert_eq!("puppy".parse::<LifeStage>().unwrap(), LifeStage::Young);
        assert_eq!("Lactating".parse::<LifeStage>().unwrap(), LifeStage::Reproductive);
        assert!("toddler".parse::<LifeStage>().is_err());
        let parsed: LifeStage = serde_json::from_str("\"kitten\"").unwrap();
        assert_eq!(parsed, LifeStage::Young);
    }

    #[test]
    fn enum_text_round_trips_through_as_str() {
        for ft in [
            FoodType::Dry,
            FoodType::Wet,
            FoodType::Raw,
            FoodType::Homemade,
            FoodType::Treat,
            FoodType::Supplement,
        ] {
            assert_eq!(ft.as_str().parse::<FoodType>().unwrap(), ft);
        }
        for level in [ActivityLevel::Low, ActivityLevel::Moderate, ActivityLevel::High] {
            assert_eq!(level.as_str().parse::<ActivityLevel>().unwrap(), level);
        }
    }

    #[test]
    fn intake_prefers_eaten_amount() {
        let mut feeding = FeedingRecord {
            food_id: Uuid::new_v4(),
            feeding_date: time::macros::date!(2024 - 03 - 01),
            meal_number: 1,
            amount_served_grams: 120.0,
            amount_eaten_grams: Some(90.0),
        };
        assert_eq!(feeding.intake_grams(), 90.0);
        feeding.amount_eaten_grams = None;
        assert_eq!(feeding.intake_grams(), 120.0);
    }

    #[test]
    fn empty_tags_mean_suitable_for_all() {
        let food = CatalogFood {
            id: Uuid::new_v4(),
            name: "Any".into(),
            nutrients: FoodNutrients {
                food_type: FoodType::Dry,
                moisture_pct: 10.0,
                protein_pct: 25.0,
                fat_pct: 12.0,
                fiber_pct: 3.0,
                carbohydrate_pct: None,
                ash_pct: None,
                serving_size_grams: None,
                calories_per_100g: None,
            },
            price_per_kg: None,
            species: vec![],
            life_stages: vec![LifeStage::Adult],
        };
        assert!(food.is_suitable_for(Species::Cat, LifeStage::Adult));
        assert!(!food.is_suitable_for(Species::Cat, LifeStage::Young));
    }
}
