use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateFeedingRequest, FeedingQuery},
    repo::{self, NewFeeding},
    repo_types::FeedingRow,
};
use crate::{error::AppError, foods, nutrition::validation, pets, state::AppState};

pub async fn list(
    state: &AppState,
    household_id: Uuid,
    query: FeedingQuery,
) -> Result<Vec<FeedingRow>, AppError> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(AppError::validation("from must not be after to"));
        }
    }
    Ok(repo::list(&state.db, household_id, query.pet_id, query.from, query.to).await?)
}

pub async fn create(
    state: &AppState,
    household_id: Uuid,
    req: CreateFeedingRequest,
) -> Result<FeedingRow, AppError> {
    validation::validate_feeding(req.meal_number, req.amount_served_grams, req.amount_eaten_grams)
        .map_err(|problems| {
            warn!(pet_id = %req.pet_id, ?problems, "feeding rejected");
            AppError::Validation(problems)
        })?;

    // Both must belong to the caller's household.
    let pet = pets::services::load_pet(state, household_id, req.pet_id).await?;
    let food = foods::services::load_food(state, household_id, req.food_id).await?;

    let new = NewFeeding {
        pet_id: pet.id,
        food_id: food.id,
        feeding_date: req
            .feeding_date
            .unwrap_or_else(|| OffsetDateTime::now_utc().date()),
        meal_number: req.meal_number,
        amount_served_grams: req.amount_served_grams,
        amount_eaten_grams: req.amount_eaten_grams,
        notes: req.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()),
    };
    let feeding = repo::insert(&state.db, &new).await?;
    info!(
        feeding_id = %feeding.id,
        pet_id = %pet.id,
        food_id = %food.id,
        grams = feeding.amount_served_grams,
        "feeding logged"
    );
    Ok(feeding)
}

pub async fn delete(state: &AppState, household_id: Uuid, feeding_id: Uuid) -> Result<(), AppError> {
    if !repo::delete(&state.db, household_id, feeding_id).await? {
        return Err(AppError::NotFound("feeding"));
    }
    info!(%feeding_id, "feeding deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[tokio::test]
    async fn eaten_above_served_is_rejected_before_any_query() {
        let state = AppState::fake();
        let req = CreateFeedingRequest {
            pet_id: Uuid::new_v4(),
            food_id: Uuid::new_v4(),
            feeding_date: None,
            meal_number: 1,
            amount_served_grams: 100.0,
            amount_eaten_grams: Some(150.0),
            notes: None,
        };
        let err = create(&state, Uuid::new_v4(), req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let state = AppState::fake();
        let query = FeedingQuery {
            pet_id: None,
            from: Some(date!(2024 - 06 - 10)),
            to: Some(date!(2024 - 06 - 01)),
        };
        let err = list(&state, Uuid::new_v4(), query).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
