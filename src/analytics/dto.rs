use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::nutrition::{FoodRecommendation, MealBalance, NutritionAnalysis, NutritionalGap};

#[derive(Debug, Default, Deserialize)]
pub struct NutritionQuery {
    pub window_days: Option<u32>,
    /// Last day of the window; defaults to today (UTC).
    pub end: Option<Date>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    pub window_days: Option<u32>,
    pub end: Option<Date>,
    pub top_k: Option<usize>,
}

/// Recommend against caller-supplied gaps instead of the computed ones.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub gaps: Vec<NutritionalGap>,
    pub top_k: Option<usize>,
    pub window_days: Option<u32>,
    pub end: Option<Date>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MealBalanceQuery {
    pub date: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct NutritionResponse {
    pub pet_id: Uuid,
    pub pet_name: String,
    #[serde(flatten)]
    pub analysis: NutritionAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationsResponse {
    pub pet_id: Uuid,
    pub data_sufficient: bool,
    pub approximate: bool,
    pub calorie_target: f64,
    pub current_daily_calories: f64,
    /// The gaps the ranking was computed against.
    pub gaps: Vec<NutritionalGap>,
    pub recommendations: Vec<FoodRecommendation>,
}

#[derive(Debug, Serialize)]
pub struct MealBalanceResponse {
    pub pet_id: Uuid,
    pub date: Date,
    pub tolerance_pct: f64,
    pub meals: Vec<MealBalance>,
}
