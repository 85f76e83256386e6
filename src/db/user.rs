//! User entity and repository.

use super::DbPool;
use crate::auth::username_base;
use crate::Result;

/// User entity representing a registered account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Email address (unique, login key).
    pub email: String,
    /// Username (unique, derived from the email local-part).
    pub username: String,
    /// Password hash (Argon2).
    pub password: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Whether the email address has been verified.
    pub is_email_verified: bool,
    /// Whether the account is active.
    pub is_active: bool,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl User {
    /// Display name used in outgoing mail: first name if present,
    /// otherwise the username.
    pub fn display_name(&self) -> &str {
        if self.first_name.is_empty() {
            &self.username
        } else {
            &self.first_name
        }
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address.
    pub email: String,
    /// Password hash (should be pre-hashed with Argon2).
    pub password: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
}

impl NewUser {
    /// Create a new user with minimal required fields.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    /// Set the first and last names.
    pub fn with_names(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }
}

/// Data for updating an existing user.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
}

impl UserUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new first name.
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Set new last name.
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user, deriving a unique username from the email
    /// local-part. On username collision a numeric suffix is appended
    /// and incremented until a free name is found.
    ///
    /// Email uniqueness is enforced by the UNIQUE constraint; the caller
    /// receives the database error on a duplicate.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let username = self.next_free_username(&new_user.email).await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (email, username, password, first_name, last_name)
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&new_user.email)
        .bind(&username)
        .bind(&new_user.password)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| crate::AuthError::NotFound("user".into()))
    }

    /// Find the first free username for the given email: the local-part,
    /// then local-part + incrementing counter.
    async fn next_free_username(&self, email: &str) -> Result<String> {
        let base = username_base(email);
        let mut candidate = base.clone();
        let mut counter = 1u32;
        while self.username_exists(&candidate).await? {
            candidate = format!("{base}{counter}");
            counter += 1;
        }
        Ok(candidate)
    }

    /// Check whether a username is already taken.
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, username, password, first_name, last_name,
                    is_email_verified, is_active, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by email address.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, username, password, first_name, last_name,
                    is_email_verified, is_active, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Apply a partial update (name fields only) and return the updated user.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        if let Some(ref first_name) = update.first_name {
            sqlx::query(
                "UPDATE users SET first_name = $1, updated_at = datetime('now') WHERE id = $2",
            )
            .bind(first_name)
            .bind(id)
            .execute(self.pool)
            .await?;
        }

        if let Some(ref last_name) = update.last_name {
            sqlx::query(
                "UPDATE users SET last_name = $1, updated_at = datetime('now') WHERE id = $2",
            )
            .bind(last_name)
            .bind(id)
            .execute(self.pool)
            .await?;
        }

        self.get_by_id(id).await
    }

    /// Replace the password hash.
    pub async fn set_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET password = $1, updated_at = datetime('now') WHERE id = $2",
        )
        .bind(password_hash)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark the user's email address as verified.
    pub async fn mark_email_verified(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET is_email_verified = 1, updated_at = datetime('now') WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
