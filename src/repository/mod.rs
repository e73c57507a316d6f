//! Persistence collaborators
//!
//! The services only see the [`UserStore`] and [`NoteStore`] traits. Absence is
//! `Ok(None)`; every other failure is an error that surfaces as a 500.

pub mod memory;
pub mod note_repo;
pub mod user_repo;

pub use memory::{MemoryNoteStore, MemoryUserStore};
pub use note_repo::NoteRepository;
pub use user_repo::UserRepository;

use crate::{
    db::HealthStatus,
    error::AppError,
    models::{
        note::{Note, NoteChanges},
        user::{Role, User, UserChanges},
    },
};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; a taken username is a validation error
    async fn insert(&self, user: &User) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// List users, optionally restricted to one role
    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, AppError>;

    /// Apply changes and return the post-update record
    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, AppError>;

    /// Delete and return the removed record
    async fn delete(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Storage liveness check
    async fn health_check(&self) -> HealthStatus;
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn insert(&self, note: &Note) -> Result<Note, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>, AppError>;

    async fn list_by_author(&self, author: Uuid) -> Result<Vec<Note>, AppError>;

    /// Apply changes and return the post-update record
    async fn update(&self, id: Uuid, changes: &NoteChanges) -> Result<Option<Note>, AppError>;

    /// Delete and return the removed record
    async fn delete(&self, id: Uuid) -> Result<Option<Note>, AppError>;
}

pub(crate) fn username_taken() -> AppError {
    AppError::Validation("A user with that username already exists!".to_string())
}

/// A note whose author is not a stored user
pub(crate) fn missing_author() -> AppError {
    AppError::Validation("Every note must have an author!".to_string())
}
