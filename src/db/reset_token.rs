//! Password reset token repository.
//!
//! Reset tokens authorize exactly one password change. A token marked
//! used is permanently inert, regardless of its expiry time. Lookups
//! only ever consider unused tokens, so a consumed token is
//! indistinguishable from an unknown one.

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{format_timestamp, DbPool};
use crate::Result;

/// Password reset token entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PasswordResetToken {
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
    /// Whether the token has been consumed.
    pub is_used: bool,
}

impl PasswordResetToken {
    /// Check whether the token has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= format_timestamp(Utc::now())
    }
}

/// New reset token for creation.
pub struct NewResetToken {
    /// Owning user ID.
    pub user_id: i64,
    /// Token value.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: String,
}

impl NewResetToken {
    /// Generate a fresh token for a user with the given lifetime.
    pub fn generate(user_id: i64, ttl_mins: u64) -> Self {
        Self {
            user_id,
            token: Uuid::new_v4().to_string(),
            expires_at: format_timestamp(Utc::now() + Duration::minutes(ttl_mins as i64)),
        }
    }
}

/// Repository for password reset token operations.
pub struct ResetTokenRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ResetTokenRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new reset token.
    pub async fn create(&self, new_token: &NewResetToken) -> Result<PasswordResetToken> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO password_reset_tokens (user_id, token, expires_at)
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new_token.user_id)
        .bind(&new_token.token)
        .bind(&new_token.expires_at)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| crate::AuthError::NotFound("reset token".into()))
    }

    /// Get a reset token by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<PasswordResetToken>> {
        let token = sqlx::query_as::<_, PasswordResetToken>(
            "SELECT id, user_id, token, created_at, expires_at, is_used
             FROM password_reset_tokens WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(token)
    }

    /// Get an *unused* reset token by its value. Used tokens never match.
    ///
    /// Expiry is the caller's concern: an expired match must produce a
    /// different error than an unknown token.
    pub async fn get_unused_by_token(&self, token: &str) -> Result<Option<PasswordResetToken>> {
        let result = sqlx::query_as::<_, PasswordResetToken>(
            "SELECT id, user_id, token, created_at, expires_at, is_used
             FROM password_reset_tokens WHERE token = $1 AND is_used = 0",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Mark a token as used. Permanent: there is no way to clear the flag.
    pub async fn mark_used(&self, id: i64) -> Result<bool> {
        let result =
            sqlx::query("UPDATE password_reset_tokens SET is_used = 1 WHERE id = $1 AND is_used = 0")
                .bind(id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all tokens for a user (re-issuance path).
    pub async fn delete_all_for_user(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete expired and used tokens (cleanup).
    pub async fn cleanup(&self) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM password_reset_tokens
             WHERE expires_at < datetime('now') OR is_used = 1",
        )
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
