//! Note domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Note record. `author` is fixed at creation from the caller's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(title: String, text: String, author: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            text,
            author,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-sensitive substring match on title or text
    pub fn matches(&self, query: &str) -> bool {
        self.title.contains(query) || self.text.contains(query)
    }
}

/// Create note request. Has no `author` field; the author comes from the token.
#[derive(Debug, Default, Deserialize)]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub text: Option<String>,
}

/// Update note request
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub text: Option<String>,
}

/// Listing filter for `GET /api/notes`
#[derive(Debug, Default, Deserialize)]
pub struct NoteQuery {
    pub query: Option<String>,
}

/// Changes handed to the note store; `None` leaves a column untouched.
#[derive(Debug, Default, Clone)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub text: Option<String>,
}
