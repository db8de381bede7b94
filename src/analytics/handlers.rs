use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        MealBalanceQuery, MealBalanceResponse, NutritionQuery, NutritionResponse,
        RecommendationQuery, RecommendationRequest, RecommendationsResponse,
    },
    services::{self, RecommendationInput},
};
use crate::{auth::AuthHousehold, error::AppError, state::AppState};

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/pets/:id/nutrition", get(get_nutrition))
        .route(
            "/pets/:id/recommendations",
            get(get_recommendations).post(post_recommendations),
        )
        .route("/pets/:id/meal-balance", get(get_meal_balance))
}

#[instrument(skip(state))]
pub async fn get_nutrition(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
    Query(q): Query<NutritionQuery>,
) -> Result<Json<NutritionResponse>, AppError> {
    let (pet, analysis) =
        services::analyze_nutrition(&state, household_id, id, q.window_days, q.end).await?;
    Ok(Json(NutritionResponse {
        pet_id: pet.id,
        pet_name: pet.name,
        analysis,
    }))
}

#[instrument(skip(state))]
pub async fn get_recommendations(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
    Query(q): Query<RecommendationQuery>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let input = RecommendationInput {
        window_days: q.window_days,
        end: q.end,
        top_k: q.top_k,
        gaps: None,
    };
    services::recommend_foods(&state, household_id, id, input)
        .await
        .map(Json)
}

#[instrument(skip(state, payload))]
pub async fn post_recommendations(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecommendationRequest>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let input = RecommendationInput {
        window_days: payload.window_days,
        end: payload.end,
        top_k: payload.top_k,
        gaps: Some(payload.gaps),
    };
    services::recommend_foods(&state, household_id, id, input)
        .await
        .map(Json)
}

#[instrument(skip(state))]
pub async fn get_meal_balance(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
    Query(q): Query<MealBalanceQuery>,
) -> Result<Json<MealBalanceResponse>, AppError> {
    let (date, meals) = services::calculate_meal_balances(&state, household_id, id, q.date).await?;
    Ok(Json(MealBalanceResponse {
        pet_id: id,
        date,
        tolerance_pct: state.nutrition().meal_tolerance * 100.0,
        meals,
    }))
}
