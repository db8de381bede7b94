use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::FeedingRow;
use crate::nutrition::FeedingRecord;

#[derive(Debug, Deserialize)]
pub struct CreateFeedingRequest {
    pub pet_id: Uuid,
    pub food_id: Uuid,
    /// Defaults to today (UTC).
    pub feeding_date: Option<Date>,
    pub meal_number: i32,
    pub amount_served_grams: f64,
    pub amount_eaten_grams: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedingQuery {
    pub pet_id: Option<Uuid>,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct FeedingResponse {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub food_id: Uuid,
    pub feeding_date: Date,
    pub meal_number: i32,
    pub amount_served_grams: f64,
    pub amount_eaten_grams: Option<f64>,
    /// What the analysis counts: eaten, or served when eaten is unknown.
    pub intake_grams: f64,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub fed_at: OffsetDateTime,
}

impl From<FeedingRow> for FeedingResponse {
    fn from(r: FeedingRow) -> Self {
        Self {
            intake_grams: FeedingRecord::from(&r).intake_grams(),
            id: r.id,
            pet_id: r.pet_id,
            food_id: r.food_id,
            feeding_date: r.feeding_date,
            meal_number: r.meal_number,
            amount_served_grams: r.amount_served_grams,
            amount_eaten_grams: r.amount_eaten_grams,
            notes: r.notes,
            fed_at: r.fed_at,
        }
    }
}
