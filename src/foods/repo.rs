use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::FoodRow;
use crate::nutrition::{FoodNutrients, LifeStage, Species};

const FOOD_COLUMNS: &str = "id, household_id, name, brand, food_type, moisture_pct, protein_pct, \
     fat_pct, fiber_pct, carbohydrate_pct, ash_pct, serving_size_grams, calories_per_100g, \
     package_size_grams, price, species_tags, life_stage_tags, created_at, updated_at";

pub struct FoodFields<'a> {
    pub name: &'a str,
    pub brand: Option<&'a str>,
    pub nutrients: &'a FoodNutrients,
    pub package_size_grams: Option<f64>,
    pub price: Option<f64>,
    pub species: &'a [Species],
    pub life_stages: &'a [LifeStage],
}

impl FoodFields<'_> {
    fn species_tags(&self) -> Vec<String> {
        self.species.iter().map(|s| s.as_str().to_owned()).collect()
    }

    fn life_stage_tags(&self) -> Vec<String> {
        self.life_stages.iter().map(|s| s.as_str().to_owned()).collect()
    }
}

pub async fn list_by_household(db: &PgPool, household_id: Uuid) -> anyhow::Result<Vec<FoodRow>> {
    let rows = sqlx::query_as::<_, FoodRow>(&format!(
        "SELECT {FOOD_COLUMNS} FROM foods WHERE household_id = $1 ORDER BY name, created_at"
    ))
    .bind(household_id)
    .fetch_all(db)
    .await
    .context("list foods")?;
    Ok(rows)
}

pub async fn find(db: &PgPool, household_id: Uuid, food_id: Uuid) -> anyhow::Result<Option<FoodRow>> {
    let row = sqlx::query_as::<_, FoodRow>(&format!(
        "SELECT {FOOD_COLUMNS} FROM foods WHERE id = $1 AND household_id = $2"
    ))
    .bind(food_id)
    .bind(household_id)
    .fetch_optional(db)
    .await
    .context("find food")?;
    Ok(row)
}

/// Foods of the household among `ids`; missing ids are silently absent.
pub async fn find_many(db: &PgPool, household_id: Uuid, ids: &[Uuid]) -> anyhow::Result<Vec<FoodRow>> {
    let rows = sqlx::query_as::<_, FoodRow>(&format!(
        "SELECT {FOOD_COLUMNS} FROM foods WHERE household_id = $1 AND id = ANY($2)"
    ))
    .bind(household_id)
    .bind(ids)
    .fetch_all(db)
    .await
    .context("load foods by id")?;
    Ok(rows)
}

pub async fn insert(db: &PgPool, household_id: Uuid, f: &FoodFields<'_>) -> anyhow::Result<FoodRow> {
    let n = f.nutrients;
    let row = sqlx::query_as::<_, FoodRow>(&format!(
        r#"
        INSERT INTO foods (household_id, name, brand, food_type, moisture_pct, protein_pct,
                           fat_pct, fiber_pct, carbohydrate_pct, ash_pct, serving_size_grams,
                           calories_per_100g, package_size_grams, price, species_tags,
                           life_stage_tags)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING {FOOD_COLUMNS}
        "#
    ))
    .bind(household_id)
    .bind(f.name)
    .bind(f.brand)
    .bind(n.food_type.as_str())
    .bind(n.moisture_pct)
    .bind(n.protein_pct)
    .bind(n.fat_pct)
    .bind(n.fiber_pct)
    .bind(n.carbohydrate_pct)
    .bind(n.ash_pct)
    .bind(n.serving_size_grams)
    .bind(n.calories_per_100g)
    .bind(f.package_size_grams)
    .bind(f.price)
    .bind(f.species_tags())
    .bind(f.life_stage_tags())
    .fetch_one(db)
    .await
    .context("insert food")?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    household_id: Uuid,
    food_id: Uuid,
    f: &FoodFields<'_>,
) -> anyhow::Result<Option<FoodRow>> {
    let n = f.nutrients;
    let row = sqlx::query_as::<_, FoodRow>(&format!(
        r#"
        UPDATE foods
        SET name = $3, brand = $4, food_type = $5, moisture_pct = $6, protein_pct = $7,
            fat_pct = $8, fiber_pct = $9, carbohydrate_pct = $10, ash_pct = $11,
            serving_size_grams = $12, calories_per_100g = $13, package_size_grams = $14,
            price = $15, species_tags = $16, life_stage_tags = $17, updated_at = now()
        WHERE id = $1 AND household_id = $2
        RETURNING {FOOD_COLUMNS}
        "#
    ))
    .bind(food_id)
    .bind(household_id)
    .bind(f.name)
    .bind(f.brand)
    .bind(n.food_type.as_str())
    .bind(n.moisture_pct)
    .bind(n.protein_pct)
    .bind(n.fat_pct)
    .bind(n.fiber_pct)
    .bind(n.carbohydrate_pct)
    .bind(n.ash_pct)
    .bind(n.serving_size_grams)
    .bind(n.calories_per_100g)
    .bind(f.package_size_grams)
    .bind(f.price)
    .bind(f.species_tags())
    .bind(f.life_stage_tags())
    .fetch_optional(db)
    .await
    .context("update food")?;
    Ok(row)
}

pub async fn delete(db: &PgPool, household_id: Uuid, food_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM foods WHERE id = $1 AND household_id = $2")
        .bind(food_id)
        .bind(household_id)
        .execute(db)
        .await
        .context("delete food")?;
    Ok(res.rows_affected() > 0)
}

pub async fn is_referenced(db: &PgPool, food_id: Uuid) -> anyhow::Result<bool> {
    let referenced: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM feedings WHERE food_id = $1)")
            .bind(food_id)
            .fetch_one(db)
            .await
            .context("check food references")?;
    Ok(referenced)
}
