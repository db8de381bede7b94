use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AuthResponse, LoginRequest, PublicHousehold, RefreshRequest, RegisterRequest},
    jwt::{AuthHousehold, JwtKeys},
    services,
};
use crate::{error::AppError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, keys, payload))]
pub async fn register(
    State(state): State<AppState>,
    State(keys): State<JwtKeys>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    services::register(&state, &keys, payload).await.map(Json)
}

#[instrument(skip(state, keys, payload))]
pub async fn login(
    State(state): State<AppState>,
    State(keys): State<JwtKeys>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    services::login(&state, &keys, payload).await.map(Json)
}

#[instrument(skip(state, keys, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    State(keys): State<JwtKeys>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    services::refresh(&state, &keys, &payload.refresh_token)
        .await
        .map(Json)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthHousehold(household_id): AuthHousehold,
) -> Result<Json<PublicHousehold>, AppError> {
    services::me(&state, household_id).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn public_household_hides_password_hash() {
        let household = super::super::repo_types::Household {
            id: uuid::Uuid::new_v4(),
            email: "family@example.com".into(),
            name: "The Millers".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&PublicHousehold::from(household)).unwrap();
        assert!(json.contains("family@example.com"));
        assert!(json.contains("The Millers"));
        assert!(!json.contains("argon2"));
    }
}
