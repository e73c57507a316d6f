//! Business logic services layer

pub mod auth_service;
pub mod note_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use note_service::NoteService;
pub use user_service::UserService;

use crate::error::AppError;
use uuid::Uuid;

/// Path ids that are not well-formed cannot resolve to a record
pub(crate) fn parse_record_id(id: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound(not_found.to_string()))
}
