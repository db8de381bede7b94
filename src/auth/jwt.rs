use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use super::claims::{Claims, TokenKind};
use crate::{config::JwtConfig, error::AppError, state::AppState};

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::from_secs(cfg.ttl_minutes.max(0) as u64 * 60),
            refresh_ttl: Duration::from_secs(cfg.refresh_ttl_minutes.max(0) as u64 * 60),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from(&state.config.jwt)
    }
}

impl JwtKeys {
    fn sign_with_kind(&self, household_id: Uuid, kind: TokenKind) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: household_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(%household_id, ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, household_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_kind(household_id, TokenKind::Access)
    }

    pub fn sign_refresh(&self, household_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_kind(household_id, TokenKind::Refresh)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(household_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Refresh {
            anyhow::bail!("not a refresh token");
        }
        Ok(claims)
    }
}

/// The household behind a valid access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthHousehold(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthHousehold
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing Authorization header".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Unauthorized("invalid auth scheme".into()))?;

        let claims = JwtKeys::from_ref(state).verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthorized("invalid or expired token".into())
        })?;

        if claims.kind != TokenKind::Access {
            return Err(AppError::Unauthorized("access token required".into()));
        }

        Ok(AuthHousehold(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, Request};

    fn keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 5,
            refresh_ttl_minutes: 60,
        })
    }

    async fn extract(state: &AppState, bearer: Option<&str>) -> Result<AuthHousehold, AppError> {
        let mut builder = Request::builder().uri("/api/v1/pets");
        if let Some(value) = bearer {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthHousehold::from_request_parts(&mut parts, state).await
    }

    #[test]
    fn access_token_round_trip() {
        let keys = keys("dev-secret", "petfeed", "households");
        let household = Uuid::new_v4();
        let claims = keys.verify(&keys.sign_access(household).unwrap()).unwrap();
        assert_eq!(claims.sub, household);
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.iss, "petfeed");
    }

    #[test]
    fn verify_refresh_rejects_access_tokens() {
        let keys = keys("dev-secret", "iss", "aud");
        let access = keys.sign_access(Uuid::new_v4()).unwrap();
        let err = keys.verify_refresh(&access).unwrap_err();
        assert!(err.to_string().contains("not a refresh token"));

        let refresh = keys.sign_refresh(Uuid::new_v4()).unwrap();
        assert_eq!(keys.verify_refresh(&refresh).unwrap().kind, TokenKind::Refresh);
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let good = keys("same-secret", "good-iss", "good-aud");
        let bad = keys("same-secret", "bad-iss", "bad-aud");
        let token = good.sign_access(Uuid::new_v4()).unwrap();
        assert!(bad.verify(&token).is_err());
    }

    #[tokio::test]
    async fn extractor_accepts_access_token() {
        let state = AppState::fake();
        let household = Uuid::new_v4();
        let token = JwtKeys::from_ref(&state).sign_access(household).unwrap();
        let AuthHousehold(id) = extract(&state, Some(&format!("Bearer {token}")))
            .await
            .unwrap();
        assert_eq!(id, household);
    }

    #[tokio::test]
    async fn extractor_rejects_missing_and_refresh_tokens() {
        let state = AppState::fake();
        assert!(matches!(
            extract(&state, None).await,
            Err(AppError::Unauthorized(_))
        ));

        let refresh = JwtKeys::from_ref(&state).sign_refresh(Uuid::new_v4()).unwrap();
        assert!(matches!(
            extract(&state, Some(&format!("Bearer {refresh}"))).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
