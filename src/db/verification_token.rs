//! Email verification token repository.
//!
//! Verification tokens prove ownership of an email address. They are
//! single-use (deleted on successful verification) and time-limited.
//! An expired token is rejected but left in place; it is removed either
//! by the next re-issuance for the same user or by the cleanup task.

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{format_timestamp, DbPool};
use crate::Result;

/// Email verification token entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmailVerificationToken {
    /// Token ID.
    pub id: i64,
    /// Owning user ID.
    pub user_id: i64,
    /// Opaque token value (uuid v4).
    pub token: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Expiration timestamp.
    pub expires_at: String,
}

impl EmailVerificationToken {
    /// Check whether the token has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= format_timestamp(Utc::now())
    }
}

/// New verification token for creation.
pub struct NewVerificationToken {
    /// Owning user ID.
    pub user_id: i64,
    /// Token value.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: String,
}

impl NewVerificationToken {
    /// Generate a fresh token for a user with the given lifetime.
    pub fn generate(user_id: i64, ttl_hours: u64) -> Self {
        Self {
            user_id,
            token: Uuid::new_v4().to_string(),
            expires_at: format_timestamp(Utc::now() + Duration::hours(ttl_hours as i64)),
        }
    }
}

/// Repository for email verification token operations.
pub struct VerificationTokenRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> VerificationTokenRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new verification token.
    pub async fn create(&self, new_token: &NewVerificationToken) -> Result<EmailVerificationToken> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO email_verification_tokens (user_id, token, expires_at)
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new_token.user_id)
        .bind(&new_token.token)
        .bind(&new_token.expires_at)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| crate::AuthError::NotFound("verification token".into()))
    }

    /// Get a verification token by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<EmailVerificationToken>> {
        let token = sqlx::query_as::<_, EmailVerificationToken>(
            "SELECT id, user_id, token, created_at, expires_at
             FROM email_verification_tokens WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(token)
    }

    /// Get a verification token by its value, expired or not.
    ///
    /// Expiry is the caller's concern: an expired match must produce a
    /// different error than an unknown token.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<EmailVerificationToken>> {
        let result = sqlx::query_as::<_, EmailVerificationToken>(
            "SELECT id, user_id, token, created_at, expires_at
             FROM email_verification_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Delete a token by ID (one-time consumption).
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM email_verification_tokens WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all tokens for a user (re-issuance path).
    pub async fn delete_all_for_user(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM email_verification_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete expired tokens (cleanup).
    pub async fn cleanup(&self) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM email_verification_tokens WHERE expires_at < datetime('now')",
        )
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
