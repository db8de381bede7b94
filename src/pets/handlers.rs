use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{PetRequest, PetResponse, ScheduleRequest, ScheduleResponse},
    services,
};
use crate::{auth::AuthHousehold, error::AppError, state::AppState};

pub fn pet_routes() -> Router<AppState> {
    Router::new()
        .route("/pets", get(list_pets).post(create_pet))
        .route("/pets/:id", get(get_pet).put(update_pet).delete(delete_pet))
        .route("/pets/:id/schedule", get(get_schedule).put(put_schedule))
}

#[instrument(skip(state))]
pub async fn list_pets(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
) -> Result<Json<Vec<PetResponse>>, AppError> {
    let pets = services::list(&state, household_id).await?;
    Ok(Json(pets.into_iter().map(PetResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_pet(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Json(payload): Json<PetRequest>,
) -> Result<(StatusCode, Json<PetResponse>), AppError> {
    let pet = services::create(&state, household_id, payload).await?;
    Ok((StatusCode::CREATED, Json(pet.into())))
}

#[instrument(skip(state))]
pub async fn get_pet(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
) -> Result<Json<PetResponse>, AppError> {
    let pet = services::load_pet(&state, household_id, id).await?;
    Ok(Json(pet.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_pet(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
    Json(payload): Json<PetRequest>,
) -> Result<Json<PetResponse>, AppError> {
    let pet = services::update(&state, household_id, id, payload).await?;
    Ok(Json(pet.into()))
}

#[instrument(skip(state))]
pub async fn delete_pet(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    services::delete(&state, household_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_schedule(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let slots = services::schedule(&state, household_id, id).await?;
    Ok(Json(ScheduleResponse { pet_id: id, slots }))
}

#[instrument(skip(state, payload))]
pub async fn put_schedule(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let slots = services::replace_schedule(&state, household_id, id, payload.slots).await?;
    Ok(Json(ScheduleResponse { pet_id: id, slots }))
}
