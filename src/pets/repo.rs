use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{PetRow, ScheduleSlotRow};
use crate::nutrition::{ActivityLevel, GoalOverrides, LifeStage, MealSlot, Species};

const PET_COLUMNS: &str = "id, household_id, name, species, life_stage, weight_kg, activity_level, \
     goal_calories_kcal, goal_protein_g, goal_fat_g, goal_fiber_g, created_at, updated_at";

/// Column values shared by insert and update.
pub struct PetFields<'a> {
    pub name: &'a str,
    pub species: Species,
    pub life_stage: LifeStage,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub goals: GoalOverrides,
}

pub async fn list_by_household(db: &PgPool, household_id: Uuid) -> anyhow::Result<Vec<PetRow>> {
    let rows = sqlx::query_as::<_, PetRow>(&format!(
        "SELECT {PET_COLUMNS} FROM pets WHERE household_id = $1 ORDER BY name, created_at"
    ))
    .bind(household_id)
    .fetch_all(db)
    .await
    .context("list pets")?;
    Ok(rows)
}

pub async fn find(db: &PgPool, household_id: Uuid, pet_id: Uuid) -> anyhow::Result<Option<PetRow>> {
    let row = sqlx::query_as::<_, PetRow>(&format!(
        "SELECT {PET_COLUMNS} FROM pets WHERE id = $1 AND household_id = $2"
    ))
    .bind(pet_id)
    .bind(household_id)
    .fetch_optional(db)
    .await
    .context("find pet")?;
    Ok(row)
}

pub async fn insert(db: &PgPool, household_id: Uuid, f: &PetFields<'_>) -> anyhow::Result<PetRow> {
    let row = sqlx::query_as::<_, PetRow>(&format!(
        r#"
        INSERT INTO pets (household_id, name, species, life_stage, weight_kg, activity_level,
                          goal_calories_kcal, goal_protein_g, goal_fat_g, goal_fiber_g)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {PET_COLUMNS}
        "#
    ))
    .bind(household_id)
    .bind(f.name)
    .bind(f.species.as_str())
    .bind(f.life_stage.as_str())
    .bind(f.weight_kg)
    .bind(f.activity_level.as_str())
    .bind(f.goals.calories_kcal)
    .bind(f.goals.protein_g)
    .bind(f.goals.fat_g)
    .bind(f.goals.fiber_g)
    .fetch_one(db)
    .await
    .context("insert pet")?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    household_id: Uuid,
    pet_id: Uuid,
    f: &PetFields<'_>,
) -> anyhow::Result<Option<PetRow>> {
    let row = sqlx::query_as::<_, PetRow>(&format!(
        r#"
        UPDATE pets
        SET name = $3, species = $4, life_stage = $5, weight_kg = $6, activity_level = $7,
            goal_calories_kcal = $8, goal_protein_g = $9, goal_fat_g = $10, goal_fiber_g = $11,
            updated_at = now()
        WHERE id = $1 AND household_id = $2
        RETURNING {PET_COLUMNS}
        "#
    ))
    .bind(pet_id)
    .bind(household_id)
    .bind(f.name)
    .bind(f.species.as_str())
    .bind(f.life_stage.as_str())
    .bind(f.weight_kg)
    .bind(f.activity_level.as_str())
    .bind(f.goals.calories_kcal)
    .bind(f.goals.protein_g)
    .bind(f.goals.fat_g)
    .bind(f.goals.fiber_g)
    .fetch_optional(db)
    .await
    .context("update pet")?;
    Ok(row)
}

/// Deletes the pet with its schedule and feedings. Returns whether a row went away.
pub async fn delete(db: &PgPool, household_id: Uuid, pet_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM pets WHERE id = $1 AND household_id = $2")
        .bind(pet_id)
        .bind(household_id)
        .execute(db)
        .await
        .context("delete pet")?;
    Ok(res.rows_affected() > 0)
}

pub async fn schedule(db: &PgPool, pet_id: Uuid) -> anyhow::Result<Vec<MealSlot>> {
    let rows = sqlx::query_as::<_, ScheduleSlotRow>(
        r#"
        SELECT meal_number, label, expected_grams
        FROM meal_schedule_slots
        WHERE pet_id = $1
        ORDER BY meal_number
        "#,
    )
    .bind(pet_id)
    .fetch_all(db)
    .await
    .context("load meal schedule")?;
    Ok(rows.into_iter().map(MealSlot::from).collect())
}

/// Swaps the whole schedule in one transaction.
pub async fn replace_schedule(db: &PgPool, pet_id: Uuid, slots: &[MealSlot]) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM meal_schedule_slots WHERE pet_id = $1")
        .bind(pet_id)
        .execute(&mut *tx)
        .await
        .context("clear meal schedule")?;
    for slot in slots {
        sqlx::query(
            r#"
            INSERT INTO meal_schedule_slots (pet_id, meal_number, label, expected_grams)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(pet_id)
        .bind(slot.meal_number)
        .bind(slot.label.as_deref())
        .bind(slot.expected_grams)
        .execute(&mut *tx)
        .await
        .context("insert meal slot")?;
    }
    tx.commit().await?;
    Ok(())
}
