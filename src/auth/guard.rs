//! Authorization guard: role gate and ownership gate
//!
//! Routes declare a [`Protection`] level; per-record ownership is checked by
//! [`ensure_owner`] once the record has been looked up.

use super::middleware::AuthContext;
use crate::{
    error::{AppError, AuthFailure},
    models::{note::Note, user::Role},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

const FORBIDDEN: &str = "You are not authorized to access this resource!";

/// Kinds of caller-scoped resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Note,
}

impl ResourceKind {
    pub fn not_found_message(&self) -> &'static str {
        match self {
            ResourceKind::Note => "There is no note with the given ID!",
        }
    }
}

/// Protection level required by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    None,
    Authenticated,
    Admin,
    /// Authenticated here; the record itself is checked with [`ensure_owner`]
    OwnerOf(ResourceKind),
}

impl Protection {
    /// Check the caller identity (if any) against this level
    pub fn authorize(&self, ctx: Option<&AuthContext>) -> Result<(), AppError> {
        match self {
            Protection::None => Ok(()),
            Protection::Authenticated | Protection::OwnerOf(_) => {
                ctx.map(|_| ()).ok_or(AppError::Authentication(AuthFailure::MissingToken))
            }
            Protection::Admin => {
                let ctx = ctx.ok_or(AppError::Authentication(AuthFailure::MissingToken))?;
                require_role(ctx, Role::Admin)
            }
        }
    }
}

/// Role gate
pub fn require_role(ctx: &AuthContext, required: Role) -> Result<(), AppError> {
    if ctx.role == required {
        return Ok(());
    }

    tracing::warn!(
        subject = %ctx.subject,
        role = %ctx.role,
        required = %required,
        "Role check failed"
    );
    Err(AppError::Authorization(FORBIDDEN.to_string()))
}

/// Resources that record the user who owns them
pub trait OwnedResource {
    const KIND: ResourceKind;

    fn owner_id(&self) -> Uuid;
}

impl OwnedResource for Note {
    const KIND: ResourceKind = ResourceKind::Note;

    fn owner_id(&self) -> Uuid {
        self.author
    }
}

/// Ownership gate. Existence is checked strictly before ownership, so a
/// missing record is a 404 for every caller and a foreign one is a 403.
pub fn ensure_owner<T: OwnedResource>(resource: Option<T>, owner: Uuid) -> Result<T, AppError> {
    let resource = resource.ok_or_else(|| AppError::NotFound(T::KIND.not_found_message().to_string()))?;

    if resource.owner_id() != owner {
        tracing::warn!(
            caller = %owner,
            owner = %resource.owner_id(),
            kind = ?T::KIND,
            "Ownership check failed"
        );
        return Err(AppError::Authorization(FORBIDDEN.to_string()));
    }

    Ok(resource)
}

/// Route layer enforcing the declared [`Protection`]; must run after
/// `jwt_auth_middleware`.
pub async fn protect(
    State(protection): State<Protection>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    protection.authorize(req.extensions().get::<AuthContext>())?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> AuthContext {
        AuthContext {
            subject: Uuid::new_v4().to_string(),
            role,
        }
    }

    fn note_by(author: Uuid) -> Note {
        Note::new("title".to_string(), "text".to_string(), author)
    }

    #[test]
    fn test_admin_protection() {
        assert!(Protection::Admin.authorize(Some(&ctx(Role::Admin))).is_ok());

        let denied = Protection::Admin.authorize(Some(&ctx(Role::Client))).unwrap_err();
        assert!(matches!(denied, AppError::Authorization(_)));

        let anonymous = Protection::Admin.authorize(None).unwrap_err();
        assert!(matches!(anonymous, AppError::Authentication(_)));
    }

    #[test]
    fn test_authenticated_protection() {
        assert!(Protection::None.authorize(None).is_ok());
        assert!(Protection::Authenticated.authorize(Some(&ctx(Role::Client))).is_ok());
        assert!(Protection::OwnerOf(ResourceKind::Note).authorize(None).is_err());
    }

    #[test]
    fn test_owner_passes() {
        let owner = Uuid::new_v4();
        let note = ensure_owner(Some(note_by(owner)), owner).unwrap();
        assert_eq!(note.author, owner);
    }

    #[test]
    fn test_missing_resource_is_not_found_for_anyone() {
        let result = ensure_owner::<Note>(None, Uuid::new_v4());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_foreign_resource_is_forbidden() {
        let result = ensure_owner(Some(note_by(Uuid::new_v4())), Uuid::new_v4());
        let err = result.unwrap_err();

        assert!(matches!(err, AppError::Authorization(_)));
        assert_eq!(err.code(), 403);
    }
}
