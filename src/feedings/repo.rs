use anyhow::Context;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::FeedingRow;

const FEEDING_COLUMNS: &str = "f.id, f.pet_id, f.food_id, f.feeding_date, f.meal_number, \
     f.amount_served_grams, f.amount_eaten_grams, f.notes, f.fed_at";

pub struct NewFeeding<'a> {
    pub pet_id: Uuid,
    pub food_id: Uuid,
    pub feeding_date: Date,
    pub meal_number: i32,
    pub amount_served_grams: f64,
    pub amount_eaten_grams: Option<f64>,
    pub notes: Option<&'a str>,
}

/// Household feedings, optionally narrowed to one pet and an inclusive date range.
pub async fn list(
    db: &PgPool,
    household_id: Uuid,
    pet_id: Option<Uuid>,
    from: Option<Date>,
    to: Option<Date>,
) -> anyhow::Result<Vec<FeedingRow>> {
    let rows = sqlx::query_as::<_, FeedingRow>(&format!(
        r#"
        SELECT {FEEDING_COLUMNS}
        FROM feedings f
        JOIN pets p ON p.id = f.pet_id
        WHERE p.household_id = $1
          AND ($2::uuid IS NULL OR f.pet_id = $2)
          AND ($3::date IS NULL OR f.feeding_date >= $3)
          AND ($4::date IS NULL OR f.feeding_date <= $4)
        ORDER BY f.feeding_date DESC, f.meal_number, f.fed_at
        "#
    ))
    .bind(household_id)
    .bind(pet_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
    .context("list feedings")?;
    Ok(rows)
}

/// One pet's feedings in `[start, end]`, oldest first.
pub async fn for_pet_between(
    db: &PgPool,
    pet_id: Uuid,
    start: Date,
    end: Date,
) -> anyhow::Result<Vec<FeedingRow>> {
    let rows = sqlx::query_as::<_, FeedingRow>(&format!(
        r#"
        SELECT {FEEDING_COLUMNS}
        FROM feedings f
        WHERE f.pet_id = $1 AND f.feeding_date BETWEEN $2 AND $3
        ORDER BY f.feeding_date, f.meal_number, f.fed_at
        "#
    ))
    .bind(pet_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
    .context("load pet feedings")?;
    Ok(rows)
}

pub async fn insert(db: &PgPool, new: &NewFeeding<'_>) -> anyhow::Result<FeedingRow> {
    let row = sqlx::query_as::<_, FeedingRow>(
        r#"
        INSERT INTO feedings (pet_id, food_id, feeding_date, meal_number,
                              amount_served_grams, amount_eaten_grams, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, pet_id, food_id, feeding_date, meal_number,
                  amount_served_grams, amount_eaten_grams, notes, fed_at
        "#,
    )
    .bind(new.pet_id)
    .bind(new.food_id)
    .bind(new.feeding_date)
    .bind(new.meal_number)
    .bind(new.amount_served_grams)
    .bind(new.amount_eaten_grams)
    .bind(new.notes)
    .fetch_one(db)
    .await
    .context("insert feeding")?;
    Ok(row)
}

pub async fn delete(db: &PgPool, household_id: Uuid, feeding_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        DELETE FROM feedings f
        USING pets p
        WHERE f.id = $1 AND p.id = f.pet_id AND p.household_id = $2
        "#,
    )
    .bind(feeding_id)
    .bind(household_id)
    .execute(db)
    .await
    .context("delete feeding")?;
    Ok(res.rows_affected() > 0)
}
