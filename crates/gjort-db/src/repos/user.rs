use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gjort_common::models::auth::User;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "user_id, username, email, password_hash, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Wire-safe projection -- drops the password hash.
    pub fn to_user(&self) -> User {
        User {
            id: self.user_id,
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for user records
pub struct UserRepo;

impl UserRepo {
    /// Create a user. The caller supplies an already-hashed password;
    /// plaintext never reaches this layer. Unique violations on username
    /// or email propagate for the caller to map to CONFLICT.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (user_id, username, email, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .context("Failed to create user")?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by id")?;
        Ok(row)
    }

    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by email")?;
        Ok(row)
    }

    pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by username")?;
        Ok(row)
    }
}
