use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateFeedingRequest, FeedingQuery, FeedingResponse},
    services,
};
use crate::{auth::AuthHousehold, error::AppError, state::AppState};

/// Feedings are immutable: there is no update route.
pub fn feeding_routes() -> Router<AppState> {
    Router::new()
        .route("/feedings", get(list_feedings).post(create_feeding))
        .route("/feedings/:id", delete(delete_feeding))
}

#[instrument(skip(state))]
pub async fn list_feedings(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Query(query): Query<FeedingQuery>,
) -> Result<Json<Vec<FeedingResponse>>, AppError> {
    let rows = services::list(&state, household_id, query).await?;
    Ok(Json(rows.into_iter().map(FeedingResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_feeding(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Json(payload): Json<CreateFeedingRequest>,
) -> Result<(StatusCode, Json<FeedingResponse>), AppError> {
    let row = services::create(&state, household_id, payload).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[instrument(skip(state))]
pub async fn delete_feeding(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    services::delete(&state, household_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
