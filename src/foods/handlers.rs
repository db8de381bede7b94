use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{FoodRequest, FoodResponse},
    services,
};
use crate::{auth::AuthHousehold, error::AppError, state::AppState};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/:id", get(get_food).put(update_food).delete(delete_food))
}

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
) -> Result<Json<Vec<FoodResponse>>, AppError> {
    let rows = services::list(&state, household_id).await?;
    let foods = rows
        .into_iter()
        .map(|row| FoodResponse::from_row(row, state.nutrition()))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Json(foods))
}

#[instrument(skip(state, payload))]
pub async fn create_food(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Json(payload): Json<FoodRequest>,
) -> Result<(StatusCode, Json<FoodResponse>), AppError> {
    let row = services::create(&state, household_id, payload).await?;
    let food = FoodResponse::from_row(row, state.nutrition())?;
    Ok((StatusCode::CREATED, Json(food)))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
) -> Result<Json<FoodResponse>, AppError> {
    let row = services::load_food(&state, household_id, id).await?;
    Ok(Json(FoodResponse::from_row(row, state.nutrition())?))
}

#[instrument(skip(state, payload))]
pub async fn update_food(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
    Json(payload): Json<FoodRequest>,
) -> Result<Json<FoodResponse>, AppError> {
    let row = services::update(&state, household_id, id, payload).await?;
    Ok(Json(FoodResponse::from_row(row, state.nutrition())?))
}

#[instrument(skip(state))]
pub async fn delete_food(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    services::delete(&state, household_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
