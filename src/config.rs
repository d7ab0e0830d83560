//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `JWT_SECRET` (required): HMAC secret used to sign bearer tokens
/// - `DATABASE_URL` (optional): SQLite connection string, defaults to `sqlite://wallet.db?mode=rwc`
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3001
/// - `JWT_TTL_HOURS` (optional): token lifetime, defaults to 24
/// - `SETTLEMENT_POLL_INTERVAL_MS` (optional): how often pending transfers are checked, defaults to 500
/// - `CORS_ORIGINS` (optional): comma-separated allowed origins
/// - `SEED_DEFAULT_USER` (optional): create `user@example.com` on startup, defaults to true
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub jwt_secret: String,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_jwt_ttl_hours")]
    pub jwt_ttl_hours: i64,

    #[serde(default = "default_poll_interval_ms")]
    pub settlement_poll_interval_ms: u64,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,

    #[serde(default = "default_seed_user")]
    pub seed_default_user: bool,
}

fn default_database_url() -> String {
    "sqlite://wallet.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_port() -> u16 {
    3001
}

fn default_jwt_ttl_hours() -> i64 {
    24
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_cors_origins() -> String {
    "http://localhost:3000,http://localhost:3001".to_string()
}

fn default_seed_user() -> bool {
    true
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing or a value cannot be parsed.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }

    /// Never zero; a zero period would make the worker's interval panic.
    pub fn settlement_poll_interval(&self) -> Duration {
        Duration::from_millis(self.settlement_poll_interval_ms.max(1))
    }

    /// Allowed CORS origins, trimmed, with blanks dropped.
    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let vars = vec![("JWT_SECRET".to_string(), "s3cret".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.server_port, 3001);
        assert_eq!(config.jwt_ttl_hours, 24);
        assert_eq!(config.database_max_connections, 5);
        assert!(config.seed_default_user);
        assert_eq!(
            config.settlement_poll_interval(),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn missing_secret_is_an_error() {
        let vars: Vec<(String, String)> = vec![];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }

    #[test]
    fn cors_origins_are_split() {
        let vars = vec![
            ("JWT_SECRET".to_string(), "s3cret".to_string()),
            (
                "CORS_ORIGINS".to_string(),
                " http://a.test , ,http://b.test".to_string(),
            ),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(
            config.cors_origin_list(),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
