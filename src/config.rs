use std::env;
use std::str::FromStr;

use anyhow::Context;
use tracing::warn;

use crate::engine::ScoringPolicy;

const DEV_JWT_SECRET: &str = "default-secret-change-in-production";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub cors_allowed_origins: String,
    pub environment: String,
    pub auto_migrate: bool,
    pub scoring: ScoringPolicy,
}

impl Config {
    /// Reads `.env` (if present) and the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using default (not secure for production)");
            DEV_JWT_SECRET.to_string()
        });

        // Railway uses RAILWAY_ENVIRONMENT_NAME, fallback to ENVIRONMENT
        let environment = env::var("RAILWAY_ENVIRONMENT_NAME")
            .or_else(|_| env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "development".to_string());

        let defaults = ScoringPolicy::default();
        let scoring = ScoringPolicy {
            delivery: parse_or("SCORE_DELIVERY", defaults.delivery),
            on_time: parse_or("SCORE_ON_TIME", defaults.on_time),
            early_per_day: parse_or("SCORE_EARLY_PER_DAY", defaults.early_per_day),
            qa_first_pass: parse_or("SCORE_QA_FIRST_PASS", defaults.qa_first_pass),
            qa_rejection: parse_or("SCORE_QA_REJECTION", defaults.qa_rejection),
            deadline_missed: parse_or("SCORE_DEADLINE_MISSED", defaults.deadline_missed),
            delay_per_day: parse_or("SCORE_DELAY_PER_DAY", defaults.delay_per_day),
        };

        Ok(Self {
            database_url,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            jwt_secret,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string()),
            environment,
            auto_migrate: parse_or("AUTO_MIGRATE", false),
            scoring,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, ?default, "Unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}
