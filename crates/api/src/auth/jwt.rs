//! JWT access tokens for owner sessions.
//!
//! Tokens are HS256-signed and carry the owner's id and, when known, email
//! address. Respondents never hold a JWT; they present a magic token.

use brieflink_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{parse_env, require_env, ConfigError};

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the owner's user id.
    pub sub: DbId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret.
    pub secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;

impl JwtConfig {
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `15`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = require_env("JWT_SECRET")?;

        Ok(Self {
            secret,
            access_token_expiry_mins: parse_env(
                "JWT_ACCESS_EXPIRY_MINS",
                DEFAULT_ACCESS_EXPIRY_MINS,
            )?,
        })
    }
}

/// Generate an HS256 access token for an owner.
pub fn generate_access_token(
    user_id: DbId,
    email: Option<&str>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        email: email.map(str::to_string),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate signature and expiry, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        }
    }

    #[test]
    fn round_trips_owner_identity() {
        let config = test_config();
        let token = generate_access_token(42, Some("owner@example.com"), &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email.as_deref(), Some("owner@example.com"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: None,
            // Well past the default 60 second leeway.
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn foreign_secret_fails() {
        let token = generate_access_token(1, None, &test_config()).unwrap();
        let other = JwtConfig {
            secret: "a-different-secret".to_string(),
            access_token_expiry_mins: 15,
        };
        assert!(validate_token(&token, &other).is_err());
    }
}
