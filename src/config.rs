use serde::Deserialize;

use crate::nutrition::{recommender::DEFAULT_TOP_K, NutritionConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Request-level knobs for the analytics endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    pub default_window_days: u32,
    pub max_window_days: u32,
    pub default_top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_window_days: 7,
            max_window_days: 90,
            default_top_k: DEFAULT_TOP_K,
        }
    }
}

impl AnalysisConfig {
    /// Requested window, defaulted and clamped to `[1, max_window_days]`.
    pub fn window_days(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_window_days)
            .clamp(1, self.max_window_days.max(1))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub analysis: AnalysisConfig,
    pub nutrition: NutritionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "petfeed".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "petfeed-households".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES").unwrap_or(60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES").unwrap_or(60 * 24 * 14),
        };

        let defaults = AnalysisConfig::default();
        let analysis = AnalysisConfig {
            default_window_days: env_parse("ANALYSIS_WINDOW_DAYS")
                .unwrap_or(defaults.default_window_days),
            max_window_days: env_parse("ANALYSIS_MAX_WINDOW_DAYS")
                .unwrap_or(defaults.max_window_days),
            default_top_k: env_parse("RECOMMENDATION_TOP_K").unwrap_or(defaults.default_top_k),
        };

        let mut nutrition = NutritionConfig::default();
        if let Some(pct) = env_parse::<f64>("MEAL_TOLERANCE_PCT") {
            nutrition.meal_tolerance = pct / 100.0;
        }

        Ok(Self {
            database_url,
            jwt,
            analysis,
            nutrition,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_days_are_clamped() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.window_days(None), 7);
        assert_eq!(cfg.window_days(Some(0)), 1);
        assert_eq!(cfg.window_days(Some(30)), 30);
        assert_eq!(cfg.window_days(Some(400)), 90);
    }
}
