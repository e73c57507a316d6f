//! Note access: every caller-scoped read or write goes through the
//! ownership gate before it reaches the store.

use super::parse_record_id;
use crate::{
    auth::{ensure_owner, ResourceKind},
    error::AppError,
    models::note::{CreateNoteRequest, Note, NoteChanges, UpdateNoteRequest},
    repository::{missing_author, NoteStore},
};
use std::sync::Arc;
use uuid::Uuid;

pub struct NoteService {
    notes: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteStore>) -> Self {
        Self { notes }
    }

    /// Create a note authored by `author_subject`
    pub async fn create(&self, req: CreateNoteRequest, author_subject: &str) -> Result<Note, AppError> {
        let title = match req.title {
            Some(title) if !title.is_empty() => title,
            _ => {
                return Err(AppError::Validation(
                    "Every note must have a non-empty title!".to_string(),
                ))
            }
        };

        let text = req
            .text
            .ok_or_else(|| AppError::Validation("Every note must have a text attribute!".to_string()))?;

        let author = Uuid::parse_str(author_subject)
            .map_err(|_| missing_author())?;

        let note = self.notes.insert(&Note::new(title, text, author)).await?;
        tracing::debug!(note_id = %note.id, author = %note.author, "Note created");

        Ok(note)
    }

    pub async fn read(&self, subject: &str, id: &str) -> Result<Note, AppError> {
        let owner = caller_id(subject)?;
        let id = note_id(id)?;

        ensure_owner(self.notes.find_by_id(id).await?, owner)
    }

    pub async fn update(&self, subject: &str, id: &str, req: UpdateNoteRequest) -> Result<Note, AppError> {
        let note = self.read(subject, id).await?;

        if req.title.is_none() && req.text.is_none() {
            return Err(AppError::Validation(
                "You must provide at least one note attribute!".to_string(),
            ));
        }

        if req.title.as_deref() == Some("") {
            return Err(AppError::Validation(
                "Every note must have a non-empty title!".to_string(),
            ));
        }

        let changes = NoteChanges {
            title: req.title,
            text: req.text,
        };

        self.notes
            .update(note.id, &changes)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn delete(&self, subject: &str, id: &str) -> Result<Note, AppError> {
        let note = self.read(subject, id).await?;

        self.notes.delete(note.id).await?.ok_or_else(not_found)
    }

    /// Notes owned by `subject`, optionally narrowed by a case-sensitive
    /// substring of title or text. Never an error for an empty result.
    pub async fn list(&self, subject: &str, query: Option<&str>) -> Result<Vec<Note>, AppError> {
        let owner = caller_id(subject)?;
        let notes = self.notes.list_by_author(owner).await?;

        Ok(match query {
            Some(query) if !query.is_empty() => {
                notes.into_iter().filter(|note| note.matches(query)).collect()
            }
            _ => notes,
        })
    }
}

/// The authenticated subject must be a user id; anything else means the
/// identity itself is broken, not the request.
fn caller_id(subject: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(subject)
        .map_err(|_| AppError::Internal("Author attribute is invalid or missing!".to_string()))
}

fn note_id(id: &str) -> Result<Uuid, AppError> {
    parse_record_id(id, ResourceKind::Note.not_found_message())
}

fn not_found() -> AppError {
    AppError::NotFound(ResourceKind::Note.not_found_message().to_string())
}
