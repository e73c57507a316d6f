//! Authentication-related models

use super::user::UserResponse;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /authenticate` and `POST /register`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(
        required(message = "You must provide a username!"),
        length(min = 1, message = "You must provide a username!")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "You must provide a password!"),
        length(min = 1, message = "You must provide a password!")
    )]
    pub password: Option<String>,
}

/// Issued token together with the user it identifies
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}
