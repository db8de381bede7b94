use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::FoodRequest,
    repo::{self, FoodFields},
    repo_types::FoodRow,
};
use crate::{
    error::AppError,
    nutrition::{validation, FoodNutrients},
    state::AppState,
};

pub async fn load_food(state: &AppState, household_id: Uuid, food_id: Uuid) -> Result<FoodRow, AppError> {
    repo::find(&state.db, household_id, food_id)
        .await?
        .ok_or(AppError::NotFound("food"))
}

/// Catalog-level rules on top of the nutrient checks.
pub fn validate_request(req: &FoodRequest) -> Result<(), Vec<String>> {
    let mut problems = validation::validate_food(&req.nutrients)
        .err()
        .unwrap_or_default();
    if req.name.trim().is_empty() {
        problems.push("name is required".to_owned());
    }
    if matches!(req.price, Some(p) if !p.is_finite() || p < 0.0) {
        problems.push("price must not be negative".to_owned());
    }
    if matches!(req.package_size_grams, Some(g) if !g.is_finite() || g <= 0.0) {
        problems.push("package_size_grams must be positive".to_owned());
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

fn fields(req: &FoodRequest) -> Result<FoodFields<'_>, AppError> {
    validate_request(req).map_err(|problems| {
        warn!(name = %req.name, ?problems, "food rejected");
        AppError::Validation(problems)
    })?;
    Ok(FoodFields {
        name: req.name.trim(),
        brand: req.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()),
        nutrients: &req.nutrients,
        package_size_grams: req.package_size_grams,
        price: req.price,
        species: &req.species,
        life_stages: &req.life_stages,
    })
}

/// Whether two analyses differ in anything that feeds the calculations.
pub fn nutrients_changed(stored: &FoodNutrients, incoming: &FoodNutrients) -> bool {
    stored != incoming
}

pub async fn list(state: &AppState, household_id: Uuid) -> Result<Vec<FoodRow>, AppError> {
    Ok(repo::list_by_household(&state.db, household_id).await?)
}

pub async fn create(state: &AppState, household_id: Uuid, req: FoodRequest) -> Result<FoodRow, AppError> {
    let food = repo::insert(&state.db, household_id, &fields(&req)?).await?;
    info!(food_id = %food.id, name = %food.name, "food added to catalog");
    Ok(food)
}

/// Display fields may always change; the analysis is frozen once feedings reference it.
pub async fn update(
    state: &AppState,
    household_id: Uuid,
    food_id: Uuid,
    req: FoodRequest,
) -> Result<FoodRow, AppError> {
    let new_fields = fields(&req)?;
    let current = load_food(state, household_id, food_id).await?;

    if nutrients_changed(&current.nutrients()?, &req.nutrients)
        && repo::is_referenced(&state.db, food_id).await?
    {
        warn!(%food_id, "nutrient edit on a food with feeding history");
        return Err(AppError::Conflict(
            "food is referenced by feedings; only name, brand, price, package size and tags can change"
                .into(),
        ));
    }

    let food = repo::update(&state.db, household_id, food_id, &new_fields)
        .await?
        .ok_or(AppError::NotFound("food"))?;
    info!(%food_id, "food updated");
    Ok(food)
}

pub async fn delete(state: &AppState, household_id: Uuid, food_id: Uuid) -> Result<(), AppError> {
    let food = load_food(state, household_id, food_id).await?;
    if repo::is_referenced(&state.db, food.id).await? {
        warn!(%food_id, "delete of a food with feeding history");
        return Err(AppError::Conflict(
            "food is referenced by feedings and cannot be deleted".into(),
        ));
    }
    if !repo::delete(&state.db, household_id, food_id).await? {
        return Err(AppError::NotFound("food"));
    }
    info!(%food_id, "food deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::types::FoodType;

    fn request() -> FoodRequest {
        FoodRequest {
            name: "Chicken Pate".into(),
            brand: None,
            nutrients: FoodNutrients {
                food_type: FoodType::Wet,
                moisture_pct: 78.0,
                protein_pct: 11.0,
                fat_pct: 5.0,
                fiber_pct: 1.0,
                carbohydrate_pct: None,
                ash_pct: None,
                serving_size_grams: Some(85.0),
                calories_per_100g: None,
            },
            package_size_grams: Some(400.0),
            price: Some(3.0),
            species: Vec::new(),
            life_stages: Vec::new(),
        }
    }

    #[test]
    fn accepts_a_sound_food() {
        assert!(validate_request(&request()).is_ok());
    }

    #[test]
    fn collects_catalog_and_nutrient_problems_together() {
        let mut req = request();
        req.name = "".into();
        req.price = Some(-1.0);
        req.nutrients.protein_pct = 30.0;
        req.nutrients.moisture_pct = 75.0;
        let problems = validate_request(&req).unwrap_err();
        assert!(problems.iter().any(|p| p == "name is required"));
        assert!(problems.iter().any(|p| p.contains("price")));
        assert!(problems.iter().any(|p| p.contains("more than the whole food")));
    }

    #[test]
    fn display_edits_leave_nutrients_untouched() {
        let stored = request().nutrients;
        let mut renamed = request();
        renamed.name = "Chicken Pate Deluxe".into();
        assert!(!nutrients_changed(&stored, &renamed.nutrients));

        let mut richer = request();
        richer.nutrients.protein_pct = 12.0;
        assert!(nutrients_changed(&stored, &richer.nutrients));
    }

    #[tokio::test]
    async fn invalid_food_is_rejected_before_any_query() {
        let state = AppState::fake();
        let mut req = request();
        req.nutrients.moisture_pct = 100.0;
        let err = create(&state, Uuid::new_v4(), req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
