//! JWT issuing and validation (HS256).
//!
//! Two token kinds share one signing key and are told apart by the
//! `token_use` claim: short-lived access tokens carried as bearer
//! credentials, and long-lived refresh tokens whose hashes are persisted
//! so they can be rotated and revoked.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, Result};

pub const TOKEN_USE_ACCESS: &str = "access";
pub const TOKEN_USE_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id
    pub sub: String,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Token id; persisted for refresh tokens
    pub jti: String,
    /// "access" or "refresh"
    pub token_use: String,
}

/// Signing and validation state, built once from config and shared via
/// `web::Data` / middleware.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

pub struct IssuedToken {
    pub token: String,
    pub jti: Uuid,
    pub expires_at: chrono::DateTime<Utc>,
}

impl JwtKeys {
    pub fn from_config(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            access_ttl: Duration::seconds(config.access_ttl_secs),
            refresh_ttl: Duration::seconds(config.refresh_ttl_secs),
        }
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    pub fn issue_access_token(&self, user_id: Uuid) -> Result<IssuedToken> {
        self.issue(user_id, TOKEN_USE_ACCESS, self.access_ttl)
    }

    pub fn issue_refresh_token(&self, user_id: Uuid) -> Result<IssuedToken> {
        self.issue(user_id, TOKEN_USE_REFRESH, self.refresh_ttl)
    }

    fn issue(&self, user_id: Uuid, token_use: &str, ttl: Duration) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + ttl;
        let jti = Uuid::new_v4();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: jti.to_string(),
            token_use: token_use.to_string(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok(IssuedToken {
            token,
            jti,
            expires_at,
        })
    }

    /// Validate signature and expiry; the caller checks `token_use`.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }

    /// Validate an access token and return the user id.
    pub fn validate_access_token(&self, token: &str) -> Result<Uuid> {
        let claims = self.validate(token)?;
        if claims.token_use != TOKEN_USE_ACCESS {
            return Err(AppError::Authentication(
                "token is not an access token".to_string(),
            ));
        }
        Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Authentication("invalid subject in token".to_string()))
    }

    /// Validate a refresh token and return (user id, claims).
    pub fn validate_refresh_token(&self, token: &str) -> Result<(Uuid, Claims)> {
        let claims = self.validate(token)?;
        if claims.token_use != TOKEN_USE_REFRESH {
            return Err(AppError::Authentication(
                "token is not a refresh token".to_string(),
            ));
        }
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Authentication("invalid subject in token".to_string()))?;
        Ok((user_id, claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: "unit-test-secret".to_string(),
            access_ttl_secs: 900,
            refresh_ttl_secs: 3600,
        })
    }

    #[test]
    fn access_token_round_trip() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let issued = keys.issue_access_token(user_id).expect("issue");
        let parsed = keys.validate_access_token(&issued.token).expect("validate");
        assert_eq!(parsed, user_id);
    }

    #[test]
    fn refresh_token_is_rejected_as_access_token() {
        let keys = keys();
        let issued = keys.issue_refresh_token(Uuid::new_v4()).expect("issue");
        assert!(keys.validate_access_token(&issued.token).is_err());
    }

    #[test]
    fn access_token_is_rejected_as_refresh_token() {
        let keys = keys();
        let issued = keys.issue_access_token(Uuid::new_v4()).expect("issue");
        assert!(keys.validate_refresh_token(&issued.token).is_err());
    }

    #[test]
    fn tampered_token_fails_validation() {
        let keys = keys();
        let issued = keys.issue_access_token(Uuid::new_v4()).expect("issue");
        let mut tampered = issued.token.clone();
        tampered.push('x');
        assert!(keys.validate(&tampered).is_err());
    }

    #[test]
    fn wrong_secret_fails_validation() {
        let keys = keys();
        let other = JwtKeys::from_config(&JwtConfig {
            secret: "another-secret".to_string(),
            access_ttl_secs: 900,
            refresh_ttl_secs: 3600,
        });
        let issued = keys.issue_access_token(Uuid::new_v4()).expect("issue");
        assert!(other.validate(&issued.token).is_err());
    }
}
