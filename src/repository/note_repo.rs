//! Note repository (PostgreSQL)

use super::{missing_author, NoteStore};
use crate::{
    error::AppError,
    models::note::{Note, NoteChanges},
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const FOREIGN_KEY_VIOLATION: &str = "23503";

pub struct NoteRepository {
    db: PgPool,
}

impl NoteRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NoteStore for NoteRepository {
    async fn insert(&self, note: &Note) -> Result<Note, AppError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (id, title, text, author, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(note.id)
        .bind(&note.title)
        .bind(&note.text)
        .bind(note.author)
        .bind(note.created_at)
        .bind(note.updated_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            let foreign_key_violation = e
                .as_database_error()
                .and_then(|d| d.code())
                .is_some_and(|code| code == FOREIGN_KEY_VIOLATION);

            if foreign_key_violation {
                missing_author()
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(note)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>, AppError> {
        let note = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(note)
    }

    async fn list_by_author(&self, author: Uuid) -> Result<Vec<Note>, AppError> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE author = $1 ORDER BY created_at ASC",
        )
        .bind(author)
        .fetch_all(&self.db)
        .await?;

        Ok(notes)
    }

    async fn update(&self, id: Uuid, changes: &NoteChanges) -> Result<Option<Note>, AppError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET
                title = COALESCE($2, title),
                text = COALESCE($3, text),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.text)
        .fetch_optional(&self.db)
        .await?;

        Ok(note)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Note>, AppError> {
        let note = sqlx::query_as::<_, Note>("DELETE FROM notes WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(note)
    }
}
