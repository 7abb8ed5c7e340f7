use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

/// Token lifetime.
const TOKEN_TTL_DAYS: i64 = 7;

/// bcrypt work factor.
const PASSWORD_HASH_COST: u32 = 10;

/// Claims carried by an issued bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: i64,
}

/// Issues and validates credentials: bcrypt password hashes and signed
/// bearer tokens. Everything outside this service treats both as opaque.
#[derive(Clone)]
pub struct CredentialService {
    jwt_secret: String,
}

impl CredentialService {
    pub fn new(config: &Config) -> AppResult<Self> {
        if config.jwt_secret.trim().is_empty() {
            return Err(AppError::Configuration(
                "JWT secret is not configured".to_string(),
            ));
        }

        Ok(Self {
            jwt_secret: config.jwt_secret.clone(),
        })
    }

    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        bcrypt::hash(password, PASSWORD_HASH_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> AppResult<bool> {
        bcrypt::verify(password, password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
    }

    pub fn issue_token(&self, user_id: i64, username: &str) -> AppResult<String> {
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            exp: (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Auth("Invalid or expired token".to_string()))
    }
}
