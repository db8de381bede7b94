use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Household account row. One login shared by everyone feeding the pets.
#[derive(Debug, Clone, FromRow)]
pub struct Household {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}
