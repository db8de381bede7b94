use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::FeedingRecord;

#[derive(Debug, Clone, FromRow)]
pub struct FeedingRow {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub food_id: Uuid,
    pub feeding_date: Date,
    pub meal_number: i32,
    pub amount_served_grams: f64,
    pub amount_eaten_grams: Option<f64>,
    pub notes: Option<String>,
    pub fed_at: OffsetDateTime,
}

impl From<&FeedingRow> for FeedingRecord {
    fn from(r: &FeedingRow) -> Self {
        Self {
            food_id: r.food_id,
            feeding_date: r.feeding_date,
            meal_number: r.meal_number,
            amount_served_grams: r.amount_served_grams,
            amount_eaten_grams: r.amount_eaten_grams,
        }
    }
}
