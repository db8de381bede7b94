use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{AuthResponse, LoginRequest, PublicHousehold, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password, MIN_PASSWORD_LEN},
    repo_types::Household,
};
use crate::{error::AppError, state::AppState};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

fn issue_tokens(keys: &JwtKeys, household: Household) -> Result<AuthResponse, AppError> {
    Ok(AuthResponse {
        access_token: keys.sign_access(household.id)?,
        refresh_token: keys.sign_refresh(household.id)?,
        household: household.into(),
    })
}

pub async fn register(
    state: &AppState,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let email = req.email.trim().to_lowercase();
    let name = req.name.trim();

    let mut problems = Vec::new();
    if !is_valid_email(&email) {
        problems.push("invalid email".to_owned());
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        problems.push(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    if name.is_empty() {
        problems.push("household name is required".to_owned());
    }
    if !problems.is_empty() {
        warn!(%email, ?problems, "registration rejected");
        return Err(AppError::Validation(problems));
    }

    let hash = hash_password(&req.password)?;
    let household = Household::create(&state.db, &email, name, &hash)
        .await?
        .ok_or_else(|| {
            warn!(%email, "email already registered");
            AppError::Conflict("email already registered".into())
        })?;

    info!(household_id = %household.id, %email, "household registered");
    issue_tokens(keys, household)
}

pub async fn login(
    state: &AppState,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let email = req.email.trim().to_lowercase();
    let invalid = || AppError::Unauthorized("invalid credentials".into());

    let Some(household) = Household::find_by_email(&state.db, &email).await? else {
        warn!(%email, "login for unknown email");
        return Err(invalid());
    };

    if !verify_password(&req.password, &household.password_hash)? {
        warn!(household_id = %household.id, "login with wrong password");
        return Err(invalid());
    }

    info!(household_id = %household.id, "household logged in");
    issue_tokens(keys, household)
}

pub async fn refresh(
    state: &AppState,
    keys: &JwtKeys,
    refresh_token: &str,
) -> Result<AuthResponse, AppError> {
    let claims = keys.verify_refresh(refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized("invalid refresh token".into())
    })?;

    let household = Household::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("household no longer exists".into()))?;

    issue_tokens(keys, household)
}

pub async fn me(state: &AppState, household_id: Uuid) -> Result<PublicHousehold, AppError> {
    Household::find_by_id(&state.db, household_id)
        .await?
        .map(PublicHousehold::from)
        .ok_or(AppError::NotFound("household"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("family@example.com"));
        assert!(!is_valid_email("family@example"));
        assert!(!is_valid_email("no spaces@example.com"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn register_validates_before_touching_the_database() {
        let state = AppState::fake();
        let keys = JwtKeys::from(&state.config.jwt);
        let req = RegisterRequest {
            email: "not-an-email".into(),
            password: "short".into(),
            name: "  ".into(),
        };
        match register(&state, &keys, req).await {
            Err(AppError::Validation(problems)) => assert_eq!(problems.len(), 3),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
