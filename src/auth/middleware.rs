//! Bearer-token authentication middleware

use super::token::{TokenService, VerifiedClaims};
use crate::{
    error::{AppError, AuthFailure},
    models::user::Role,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Caller identity attached to request extensions after a token verifies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub subject: String,
    pub role: Role,
}

impl From<VerifiedClaims> for AuthContext {
    fn from(claims: VerifiedClaims) -> Self {
        let identity = claims.into_identity();
        Self {
            subject: identity.subject,
            role: identity.role,
        }
    }
}

// Lets handlers take `AuthContext` directly; routes without the middleware
// reject with the same 403 as a bad token.
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Authentication(AuthFailure::MissingToken))
    }
}

/// Credential from an `Authorization: Bearer <token>` header.
///
/// A missing header, another scheme, or a header without a second part all
/// yield the empty string, which never verifies.
pub fn extract_token(headers: &HeaderMap) -> &str {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return "";
    };

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("Bearer"), Some(token)) => token,
        _ => "",
    }
}

/// Authentication middleware: verify the bearer token, then attach the caller
/// identity. A failed check ends the request here.
pub async fn jwt_auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(req.headers());
    let missing = token.is_empty();

    let Some(claims) = tokens.verify(token).decode() else {
        return Err(AppError::Authentication(if missing {
            AuthFailure::MissingToken
        } else {
            AuthFailure::InvalidToken
        }));
    };

    let auth_context = AuthContext::from(claims);
    tracing::debug!(subject = %auth_context.subject, role = %auth_context.role, "Request authenticated");

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
