//! PostgreSQL user directory

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{NewUser, User};

use super::{UserRepository, UserStoreError};

type UserRecord = (Uuid, String, String, String, DateTime<Utc>, DateTime<Utc>);

fn into_user(row: UserRecord) -> User {
    let (id, name, email, password_hash, created_at, updated_at) = row;
    User {
        id,
        name,
        email,
        password_hash,
        created_at,
        updated_at,
    }
}

/// User repository backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserStoreError> {
        let row: Option<UserRecord> = sqlx::query_as(
            r#"
            SELECT id, name, email, password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let row: Option<UserRecord> = sqlx::query_as(
            r#"
            SELECT id, name, email, password, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_user))
    }

    async fn create(&self, user: NewUser) -> Result<User, UserStoreError> {
        let row: UserRecord = sqlx::query_as(
            r#"
            INSERT INTO users (id, name, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                UserStoreError::DuplicateEmail(user.email.clone())
            }
            other => UserStoreError::Database(other),
        })?;

        Ok(into_user(row))
    }
}
