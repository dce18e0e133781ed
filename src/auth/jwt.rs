//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::domain::Actor;

pub const ADMIN_ROLE: &str = "admin";

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: String,
    /// Token lifetime in hours
    pub expiration_hours: i64,
    /// Issuer claim, checked on verification
    pub issuer: String,
}

impl From<&SecurityConfig> for JwtConfig {
    fn from(cfg: &SecurityConfig) -> Self {
        Self {
            secret: cfg.jwt_secret.clone(),
            expiration_hours: cfg.jwt_expiration_hours,
            issuer: cfg.jwt_issuer.clone(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from(&SecurityConfig::default())
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
}

impl Claims {
    pub fn new(user_id: &str, username: &str, role: &str, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// The caller as the booking core sees it.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.sub.clone(),
            is_admin: self.is_admin(),
        }
    }
}

/// Create a signed token for a user
pub fn create_token(
    user_id: &str,
    username: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(user_id, username, role, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature, expiry and issuer, then decode
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Errors that can occur during authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,
    #[error("Invalid authentication token")]
    InvalidToken,
    #[error("Token has expired")]
    ExpiredToken,
    #[error("Insufficient permissions")]
    InsufficientPermissions,
}
