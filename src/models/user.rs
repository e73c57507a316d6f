//! User domain models

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;
use validator::Validate;

/// Role carried by a user record and inside token claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Client,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "CLIENT",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    /// Role names are matched exactly (`CLIENT` / `ADMIN`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLIENT" => Ok(Role::Client),
            "ADMIN" => Ok(Role::Admin),
            other => Err(AppError::Validation(format!(
                "Invalid role: {}. Must be one of: CLIENT, ADMIN",
                other
            ))),
        }
    }
}

/// User record
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Row shape of the `users` table
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<Role>().map_err(|_| {
            AppError::Internal(format!("user {} has unknown role {}", row.id, row.role))
        })?;

        Ok(User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// User as returned to clients (no password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Create user request (admin)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        required(message = "Every user must have a username!"),
        length(min = 1, message = "Every user must have a username!")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "Every user must have a password!"),
        length(min = 1, message = "Every user must have a password!")
    )]
    pub password: Option<String>,

    pub role: Option<String>,
}

/// Update user request (admin)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Listing filters for `GET /api/users`
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub username: Option<String>,
    pub role: Option<String>,
}

/// Changes handed to the user store; `None` leaves a column untouched.
#[derive(Debug, Default, Clone)]
pub struct UserChanges {
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_uppercase_names() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("CLIENT".parse::<Role>().unwrap(), Role::Client);
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""ADMIN""#);
    }

    #[test]
    fn default_role_is_client() {
        assert_eq!(Role::default(), Role::Client);
    }

    #[test]
    fn user_response_drops_password_hash() {
        let user = User::new("alice".to_string(), "$argon2id$secret".to_string(), Role::Client);
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(json["username"], "alice");
        assert_eq!(json["role"], "CLIENT");
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn create_request_requires_username_and_password() {
        let missing = CreateUserRequest::default();
        assert!(missing.validate().is_err());

        let empty = CreateUserRequest {
            username: Some(String::new()),
            password: Some("pw".to_string()),
            role: None,
        };
        assert!(empty.validate().is_err());

        let ok = CreateUserRequest {
            username: Some("bob".to_string()),
            password: Some("pw".to_string()),
            role: None,
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn unknown_role_in_row_is_internal_error() {
        let row = UserRow {
            id: Uuid::new_v4(),
            username: "x".to_string(),
            password_hash: "h".to_string(),
            role: "ROOT".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(matches!(User::try_from(row), Err(AppError::Internal(_))));
    }
}
