//! Refresh token repository for JWT authentication.
//!
//! Refresh tokens are opaque values stored server-side; logout revokes
//! (blacklists) them by setting `revoked_at`.

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{format_timestamp, DbPool};
use crate::Result;

/// Refresh token entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    /// Token ID.
    pub id: i64,
    /// User ID.
    pub user_id: i64,
    /// Token string.
    pub token: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Expiration timestamp.
    pub expires_at: String,
    /// Revocation timestamp (None if not revoked).
    pub revoked_at: Option<String>,
}

/// New refresh token for creation.
pub struct NewRefreshToken {
    /// User ID.
    pub user_id: i64,
    /// Token string.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: String,
}

impl NewRefreshToken {
    /// Generate a fresh token for a user with the given lifetime.
    pub fn generate(user_id: i64, ttl_days: u64) -> Self {
        Self {
            user_id,
            token: Uuid::new_v4().to_string(),
            expires_at: format_timestamp(Utc::now() + Duration::days(ttl_days as i64)),
        }
    }
}

/// Repository for refresh token operations.
pub struct RefreshTokenRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> RefreshTokenRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new refresh token.
    pub async fn create(&self, new_token: &NewRefreshToken) -> Result<RefreshToken> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO refresh_tokens (user_id, token, expires_at)
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new_token.user_id)
        .bind(&new_token.token)
        .bind(&new_token.expires_at)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| crate::AuthError::NotFound("refresh token".into()))
    }

    /// Get a refresh token by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<RefreshToken>> {
        let token = sqlx::query_as::<_, RefreshToken>(
            "SELECT id, user_id, token, created_at, expires_at, revoked_at
             FROM refresh_tokens WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(token)
    }

    /// Revoke a refresh token. Returns false if the token is unknown or
    /// already revoked.
    pub async fn revoke(&self, token: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = datetime('now')
             WHERE token = $1 AND revoked_at IS NULL",
        )
        .bind(token)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete expired and revoked tokens (cleanup).
    pub async fn cleanup(&self) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM refresh_tokens
             WHERE expires_at < datetime('now') OR revoked_at IS NOT NULL",
        )
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::Database;

    async fn setup_db() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        repo.create(&NewUser::new("test@example.com", "hashedpassword"))
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_refresh_token() {
        let db = setup_db().await;
        let repo = RefreshTokenRepository::new(db.pool());

        let token = repo
            .create(&NewRefreshToken::generate(1, 7))
            .await
            .unwrap();
        assert_eq!(token.user_id, 1);
        assert!(token.revoked_at.is_none());
    }

    #[tokio::test]
    async fn test_revoke_token() {
        let db = setup_db().await;
        let repo = RefreshTokenRepository::new(db.pool());

        let token = repo
            .create(&NewRefreshToken::generate(1, 7))
            .await
            .unwrap();

        assert!(repo.revoke(&token.token).await.unwrap());

        let stored = repo.get_by_id(token.id).await.unwrap().unwrap();
        assert!(stored.revoked_at.is_some());

        // Revoking again reports no change
        assert!(!repo.revoke(&token.token).await.unwrap());

        // Unknown tokens also report no change
        assert!(!repo.revoke("unknown").await.unwrap());
    }

    #[tokio::test]
    async fn test_cleanup() {
        let db = setup_db().await;
        let repo = RefreshTokenRepository::new(db.pool());

        repo.create(&NewRefreshToken {
            user_id: 1,
            token: "old-expired".to_string(),
            expires_at: "2000-01-01 00:00:00".to_string(),
        })
        .await
        .unwrap();

        let revoked = repo.create(&NewRefreshToken::generate(1, 7)).await.unwrap();
        repo.revoke(&revoked.token).await.unwrap();

        let live = repo.create(&NewRefreshToken::generate(1, 7)).await.unwrap();

        let deleted = repo.cleanup().await.unwrap();
        assert_eq!(deleted, 2);
        assert!(repo.get_by_id(live.id).await.unwrap().is_some());
    }
}
