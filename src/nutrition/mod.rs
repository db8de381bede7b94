//! Nutrition engine: pure, synchronous calculations over pre-fetched rows.
//!
//! Flow: feedings → [`gap_analyzer`] (via [`normalizer`] and [`calculator`])
//! → [`recommender`]. [`requirements`] supplies targets and [`meal_balance`]
//! is a standalone same-day view.

pub mod calculator;
pub mod config;
pub mod error;
pub mod gap_analyzer;
pub mod meal_balance;
pub mod normalizer;
pub mod recommender;
pub mod requirements;
pub mod types;
pub mod validation;

pub use config::NutritionConfig;
pub use error::NutritionError;
pub use gap_analyzer::{AnalysisWindow, GapSeverity, NutritionAnalysis, NutritionalGap};
pub use meal_balance::MealBalance;
pub use recommender::{FoodRecommendation, RecommendationContext};
pub use types::{
    ActivityLevel, CatalogFood, FeedingRecord, FoodNutrients, GoalOverrides, LifeStage, MealSlot,
    Nutrient, PetProfile, Species,
};
