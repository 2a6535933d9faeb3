use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Startup configuration problems.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and the JWT secret have defaults
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// PostgreSQL connection string (required).
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight notifications (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Upper bound on a single notification delivery (default: `5`).
    pub notification_timeout_secs: u64,
    /// Public web origin used in links inside emails.
    pub public_base_url: String,
    /// JWT settings for owner sessions.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `DATABASE_URL`              | -- (required)           |
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                    |
    /// | `NOTIFICATION_TIMEOUT_SECS` | `5`                     |
    /// | `PUBLIC_BASE_URL`           | `http://localhost:5173` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parse_env("PORT", 3000)?,
            database_url: require_env("DATABASE_URL")?,
            cors_origins,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: parse_env("SHUTDOWN_TIMEOUT_SECS", 30)?,
            notification_timeout_secs: parse_env("NOTIFICATION_TIMEOUT_SECS", 5)?,
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:5173"),
            jwt: JwtConfig::from_env()?,
        })
    }
}

pub(crate) fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Read a variable that has no default. Empty counts as unset.
pub(crate) fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

pub(crate) fn parse_env<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => {
            let parsed = raw.trim().parse::<T>();
            parsed.map_err(|_| ConfigError::Invalid { name, value: raw })
        }
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        let port: u16 = parse_env("BRIEFLINK_TEST_UNSET_PORT", 3000).unwrap();
        assert_eq!(port, 3000);
        assert_eq!(env_or("BRIEFLINK_TEST_UNSET_HOST", "0.0.0.0"), "0.0.0.0");
    }

    #[test]
    fn required_variable_reports_its_name() {
        let err = require_env("BRIEFLINK_TEST_UNSET_DATABASE_URL").unwrap_err();
        assert!(matches!(err, ConfigError::Missing("BRIEFLINK_TEST_UNSET_DATABASE_URL")));
        assert_eq!(
            err.to_string(),
            "BRIEFLINK_TEST_UNSET_DATABASE_URL must be set in the environment"
        );
    }
}
