//! In-memory stores for the `memory` backend and tests
//!
//! Each call takes the locks for a single record operation only, so every
//! create/read/update/delete is atomic and nothing is held across requests.
//! Locks are always taken users first, then notes.

use super::{missing_author, username_taken, NoteStore, UserStore};
use crate::{
    db::HealthStatus,
    error::AppError,
    models::{
        note::{Note, NoteChanges},
        user::{Role, User, UserChanges},
    },
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Rows shared by a user store and the note stores derived from it
#[derive(Default)]
struct Tables {
    users: RwLock<Vec<User>>,
    notes: RwLock<Vec<Note>>,
}

/// Users kept in insertion order
#[derive(Default)]
pub struct MemoryUserStore {
    tables: Arc<Tables>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note store over the same tables: a note must reference an existing
    /// user, and deleting a user removes their notes.
    pub fn note_store(&self) -> MemoryNoteStore {
        MemoryNoteStore {
            tables: self.tables.clone(),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.tables.users.write().await;

        if users.iter().any(|u| u.username == user.username) {
            return Err(username_taken());
        }

        users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.tables.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, AppError> {
        Ok(self
            .tables
            .users
            .read()
            .await
            .iter()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, AppError> {
        let mut users = self.tables.users.write().await;

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(hash) = &changes.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let mut users = self.tables.users.write().await;

        let Some(index) = users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        let user = users.remove(index);

        let mut notes = self.tables.notes.write().await;
        let before = notes.len();
        notes.retain(|n| n.author != id);
        tracing::debug!(user_id = %id, removed = before - notes.len(), "Removed notes of deleted user");

        Ok(Some(user))
    }

    async fn health_check(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}

/// Notes kept in insertion order, created through [`MemoryUserStore::note_store`]
pub struct MemoryNoteStore {
    tables: Arc<Tables>,
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn insert(&self, note: &Note) -> Result<Note, AppError> {
        let users = self.tables.users.read().await;

        if !users.iter().any(|u| u.id == note.author) {
            return Err(missing_author());
        }

        self.tables.notes.write().await.push(note.clone());
        Ok(note.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>, AppError> {
        Ok(self.tables.notes.read().await.iter().find(|n| n.id == id).cloned())
    }

    async fn list_by_author(&self, author: Uuid) -> Result<Vec<Note>, AppError> {
        Ok(self.tables
            .notes
            .read()
            .await
            .iter()
            .filter(|n| n.author == author)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, changes: &NoteChanges) -> Result<Option<Note>, AppError> {
        let mut notes = self.tables.notes.write().await;

        let Some(note) = notes.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            note.title = title.clone();
        }
        if let Some(text) = &changes.text {
            note.text = text.clone();
        }
        note.updated_at = Utc::now();

        Ok(Some(note.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Note>, AppError> {
        let mut notes = self.tables.notes.write().await;

        Ok(notes
            .iter()
            .position(|n| n.id == id)
            .map(|index| notes.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryUserStore::new();
        store
            .insert(&User::new("alice".to_string(), "h".to_string(), Role::Client))
            .await
            .unwrap();

        let result = store
            .insert(&User::new("alice".to_string(), "h2".to_string(), Role::Admin))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_user_update_and_delete_return_final_state() {
        let store = MemoryUserStore::new();
        let user = store
            .insert(&User::new("bob".to_string(), "h".to_string(), Role::Client))
            .await
            .unwrap();

        let changes = UserChanges {
            password_hash: None,
            role: Some(Role::Admin),
        };
        let updated = store.update(user.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.password_hash, "h");

        assert_eq!(store.list(Some(Role::Admin)).await.unwrap().len(), 1);
        assert!(store.list(Some(Role::Client)).await.unwrap().is_empty());

        let deleted = store.delete(user.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, user.id);
        assert!(store.find_by_id(user.id).await.unwrap().is_none());
        assert!(store.delete(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_notes_listed_per_author_in_insertion_order() {
        let users = MemoryUserStore::new();
        let store = users.note_store();
        let alice = users
            .insert(&User::new("alice".to_string(), "h".to_string(), Role::Client))
            .await
            .unwrap()
            .id;
        let bob = users
            .insert(&User::new("bob".to_string(), "h".to_string(), Role::Client))
            .await
            .unwrap()
            .id;

        let first = store
            .insert(&Note::new("one".to_string(), "".to_string(), alice))
            .await
            .unwrap();
        store
            .insert(&Note::new("other".to_string(), "".to_string(), bob))
            .await
            .unwrap();
        let second = store
            .insert(&Note::new("two".to_string(), "".to_string(), alice))
            .await
            .unwrap();

        let listed = store.list_by_author(alice).await.unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[tokio::test]
    async fn test_note_requires_existing_author() {
        let users = MemoryUserStore::new();
        let store = users.note_store();

        let result = store
            .insert(&Note::new("T".to_string(), "B".to_string(), Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_deleting_user_removes_their_notes() {
        let users = MemoryUserStore::new();
        let store = users.note_store();
        let alice = users
            .insert(&User::new("alice".to_string(), "h".to_string(), Role::Client))
            .await
            .unwrap();
        let bob = users
            .insert(&User::new("bob".to_string(), "h".to_string(), Role::Client))
            .await
            .unwrap();

        let note = store
            .insert(&Note::new("T".to_string(), "B".to_string(), alice.id))
            .await
            .unwrap();
        let kept = store
            .insert(&Note::new("T".to_string(), "B".to_string(), bob.id))
            .await
            .unwrap();

        users.delete(alice.id).await.unwrap();

        assert!(store.find_by_id(note.id).await.unwrap().is_none());
        assert!(store.list_by_author(alice.id).await.unwrap().is_empty());
        assert_eq!(store.find_by_id(kept.id).await.unwrap(), Some(kept));
    }

    #[tokio::test]
    async fn test_missing_note_update_is_none() {
        let store = MemoryUserStore::new().note_store();
        let changes = NoteChanges {
            title: Some("x".to_string()),
            text: None,
        };

        assert!(store.update(Uuid::new_v4(), &changes).await.unwrap().is_none());
    }
}
