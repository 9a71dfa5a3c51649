//! Account and token lifecycle: register, login, refresh rotation, logout.
//!
//! Refresh tokens are JWTs whose SHA-256 hash is persisted; rotation
//! revokes the presented token in the same step that proves it was live,
//! so a replayed token fails even if it still verifies cryptographically.
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{refresh_token_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::security::jwt::JwtKeys;
use crate::security::password;

#[derive(Debug, serde::Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(pool: PgPool, keys: JwtKeys) -> Self {
        Self { pool, keys }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        full_name: &str,
        plaintext_password: &str,
    ) -> Result<User> {
        if user_repo::email_or_username_taken(&self.pool, email, username).await? {
            return Err(AppError::Conflict(
                "email or username already in use".to_string(),
            ));
        }

        let password_hash = password::hash_password(plaintext_password)?;

        // The pre-check above can race a concurrent register; the unique
        // indexes are the real guard, so their violation is a conflict too.
        let user = match user_repo::create_user(&self.pool, username, email, full_name, &password_hash)
            .await
        {
            Ok(user) => user,
            Err(err) if is_unique_violation(&err) => {
                return Err(AppError::Conflict(
                    "email or username already in use".to_string(),
                ))
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    pub async fn login(&self, email: &str, plaintext_password: &str) -> Result<(User, TokenPair)> {
        let user = user_repo::find_by_email(&self.pool, email)
            .await?
            .ok_or_else(|| AppError::Authentication("invalid email or password".to_string()))?;

        if !password::verify_password(plaintext_password, &user.password_hash)? {
            return Err(AppError::Authentication(
                "invalid email or password".to_string(),
            ));
        }

        let pair = self.issue_pair(user.id).await?;
        Ok((user, pair))
    }

    /// Rotate a refresh token: the presented token must verify and its
    /// stored hash must still be live; it is revoked and a new pair issued.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let (user_id, _claims) = self.keys.validate_refresh_token(refresh_token)?;

        let hash = hash_refresh_token(refresh_token);
        let revoked_user = refresh_token_repo::revoke_live_token(&self.pool, &hash)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("refresh token is revoked or unknown".to_string())
            })?;

        if revoked_user != user_id {
            return Err(AppError::Authentication(
                "refresh token does not match its record".to_string(),
            ));
        }

        self.issue_pair(user_id).await
    }

    /// Revoke every live refresh token the user holds.
    pub async fn logout(&self, user_id: Uuid) -> Result<u64> {
        let revoked = refresh_token_repo::revoke_all_for_user(&self.pool, user_id).await?;
        tracing::info!(%user_id, revoked, "logged out");
        Ok(revoked)
    }

    async fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair> {
        let access = self.keys.issue_access_token(user_id)?;
        let refresh = self.keys.issue_refresh_token(user_id)?;

        refresh_token_repo::insert_token(
            &self.pool,
            user_id,
            &hash_refresh_token(&refresh.token),
            refresh.expires_at,
        )
        .await?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            expires_in: self.keys.access_ttl_secs(),
        })
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// SHA-256 hex digest of the signed token; what the database stores.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_token_hash_is_stable_hex() {
        let a = hash_refresh_token("some.jwt.token");
        let b = hash_refresh_token("some.jwt.token");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_tokens_hash_differently() {
        assert_ne!(hash_refresh_token("token-a"), hash_refresh_token("token-b"));
    }
}
