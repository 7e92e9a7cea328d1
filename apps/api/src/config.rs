use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every knob has a working local default; deployments override via env or `.env`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint of the CV/JD match-scoring service.
    pub scoring_api_url: String,
    /// Endpoint of the social-profile behavioral evaluation service.
    pub social_api_url: String,
    /// Timeout for the synchronous scoring call.
    pub scoring_timeout_secs: u64,
    /// Timeout for the social evaluation call. Much longer: the upstream
    /// service performs synchronous scraping and verification work.
    pub social_timeout_secs: u64,
    /// Maximum number of evaluation records kept in history.
    pub history_capacity: i64,
    /// Minimum accepted CV length, in characters.
    pub min_cv_length: usize,
    /// Minimum accepted job description length, in characters.
    pub min_jd_length: usize,
    /// Directory export files are written into.
    pub export_dir: String,
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            scoring_api_url: env_or("SCORING_API_URL", "http://127.0.0.1:8000/rank/enhanced"),
            social_api_url: env_or(
                "SOCIAL_API_URL",
                "http://127.0.0.1:8000/social/evaluate",
            ),
            scoring_timeout_secs: parse_env("SCORING_TIMEOUT_SECS", 30)?,
            social_timeout_secs: parse_env("SOCIAL_TIMEOUT_SECS", 300)?,
            history_capacity: parse_env("MAX_SEARCH_HISTORY", 5)?,
            min_cv_length: parse_env("MIN_CV_LENGTH", 20)?,
            min_jd_length: parse_env("MIN_JD_LENGTH", 20)?,
            export_dir: env_or("EXPORT_DIR", "./exports"),
            database_url: env_or("DATABASE_URL", "sqlite://search_history.db?mode=rwc"),
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .ok()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}
