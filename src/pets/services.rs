use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::PetRequest,
    repo::{self, PetFields},
    repo_types::PetRow,
};
use crate::{
    error::AppError,
    nutrition::{validation, MealSlot},
    state::AppState,
};

/// Loads a pet of this household or fails with 404.
pub async fn load_pet(state: &AppState, household_id: Uuid, pet_id: Uuid) -> Result<PetRow, AppError> {
    repo::find(&state.db, household_id, pet_id)
        .await?
        .ok_or(AppError::NotFound("pet"))
}

fn fields(req: &PetRequest) -> Result<PetFields<'_>, AppError> {
    validation::validate_pet(&req.name, req.weight_kg, &req.goals).map_err(|problems| {
        warn!(?problems, "pet rejected");
        AppError::Validation(problems)
    })?;
    Ok(PetFields {
        name: req.name.trim(),
        species: req.species,
        life_stage: req.life_stage,
        weight_kg: req.weight_kg,
        activity_level: req.activity_level,
        goals: req.goals,
    })
}

pub async fn list(state: &AppState, household_id: Uuid) -> Result<Vec<PetRow>, AppError> {
    Ok(repo::list_by_household(&state.db, household_id).await?)
}

pub async fn create(state: &AppState, household_id: Uuid, req: PetRequest) -> Result<PetRow, AppError> {
    let pet = repo::insert(&state.db, household_id, &fields(&req)?).await?;
    info!(pet_id = %pet.id, %household_id, species = %pet.species, "pet created");
    Ok(pet)
}

pub async fn update(
    state: &AppState,
    household_id: Uuid,
    pet_id: Uuid,
    req: PetRequest,
) -> Result<PetRow, AppError> {
    let pet = repo::update(&state.db, household_id, pet_id, &fields(&req)?)
        .await?
        .ok_or(AppError::NotFound("pet"))?;
    info!(%pet_id, "pet updated");
    Ok(pet)
}

pub async fn delete(state: &AppState, household_id: Uuid, pet_id: Uuid) -> Result<(), AppError> {
    if !repo::delete(&state.db, household_id, pet_id).await? {
        return Err(AppError::NotFound("pet"));
    }
    info!(%pet_id, "pet deleted");
    Ok(())
}

pub async fn schedule(
    state: &AppState,
    household_id: Uuid,
    pet_id: Uuid,
) -> Result<Vec<MealSlot>, AppError> {
    let pet = load_pet(state, household_id, pet_id).await?;
    Ok(repo::schedule(&state.db, pet.id).await?)
}

pub async fn replace_schedule(
    state: &AppState,
    household_id: Uuid,
    pet_id: Uuid,
    mut slots: Vec<MealSlot>,
) -> Result<Vec<MealSlot>, AppError> {
    let pet = load_pet(state, household_id, pet_id).await?;
    validation::validate_schedule(&slots).map_err(|problems| {
        warn!(%pet_id, ?problems, "schedule rejected");
        AppError::Validation(problems)
    })?;
    slots.sort_by_key(|s| s.meal_number);
    repo::replace_schedule(&state.db, pet.id, &slots).await?;
    info!(%pet_id, meals = slots.len(), "meal schedule replaced");
    Ok(slots)
}
