//! Username/password verification against stored user records

use super::password::{PasswordHasher, PasswordMatch};
use crate::{
    error::{AppError, AuthFailure},
    models::user::User,
    repository::UserStore,
};
use std::sync::Arc;

/// Read-only check of claimed credentials against the user store
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    /// Returns the matching user record. An unknown username and a wrong
    /// password are distinct [`AuthFailure`] reasons that map to the same
    /// response.
    pub async fn verify(&self, username: &str, password: &str) -> Result<User, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            tracing::debug!(%username, "Login for unknown username");
            return Err(AppError::Authentication(AuthFailure::UnknownUser));
        };

        match self.hasher.verify(password, &user.password_hash)? {
            PasswordMatch::Match => Ok(user),
            PasswordMatch::Mismatch => {
                tracing::debug!(user_id = %user.id, "Login with wrong password");
                Err(AppError::Authentication(AuthFailure::WrongPassword))
            }
        }
    }
}
