//! User repository (PostgreSQL)

use super::{username_taken, UserStore};
use crate::{
    db::{self, HealthStatus},
    error::AppError,
    models::user::{Role, User, UserChanges, UserRow},
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL unique_violation
const UNIQUE_VIOLATION: &str = "23505";

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_user(row: Option<UserRow>) -> Result<Option<User>, AppError> {
    row.map(User::try_from).transpose()
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, user: &User) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            let unique_violation = e
                .as_database_error()
                .and_then(|d| d.code())
                .is_some_and(|code| code == UNIQUE_VIOLATION);

            if unique_violation {
                username_taken()
            } else {
                AppError::Database(e)
            }
        })?;

        User::try_from(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        into_user(row)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        into_user(row)
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT * FROM users
            WHERE ($1::TEXT IS NULL OR role = $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(role.map(|r| r.as_str()))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                password_hash = COALESCE($2, password_hash),
                role = COALESCE($3, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.password_hash)
        .bind(changes.role.map(|r| r.as_str()))
        .fetch_optional(&self.db)
        .await?;

        into_user(row)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("DELETE FROM users WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        into_user(row)
    }

    async fn health_check(&self) -> HealthStatus {
        db::health_check(&self.db).await
    }
}
