//! 认证服务：注册、登录并签发令牌

use crate::{
    auth::{CredentialVerifier, Identity, PasswordHasher, TokenService},
    error::AppError,
    models::{
        auth::{AuthResponse, CredentialsRequest},
        user::{Role, User, UserResponse},
    },
    repository::UserStore,
};
use std::sync::Arc;
use validator::Validate;

pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    verifier: CredentialVerifier,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>, hasher: PasswordHasher) -> Self {
        Self {
            verifier: CredentialVerifier::new(users.clone(), hasher.clone()),
            users,
            tokens,
            hasher,
        }
    }

    /// 自助注册，角色固定为 CLIENT
    pub async fn register(&self, req: CredentialsRequest) -> Result<AuthResponse, AppError> {
        req.validate()?;
        let (username, password) = credentials(req)?;

        let password_hash = self.hasher.hash(&password)?;
        let user = self
            .users
            .insert(&User::new(username, password_hash, Role::Client))
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        self.issue_for(user)
    }

    /// 用户登录
    pub async fn authenticate(&self, req: CredentialsRequest) -> Result<AuthResponse, AppError> {
        req.validate()?;
        let (username, password) = credentials(req)?;

        let user = self.verifier.verify(&username, &password).await?;

        tracing::info!(user_id = %user.id, "User authenticated");

        self.issue_for(user)
    }

    fn issue_for(&self, user: User) -> Result<AuthResponse, AppError> {
        let identity = Identity {
            subject: user.id.to_string(),
            role: user.role,
        };
        let token = self.tokens.issue_default(&identity)?;

        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }
}

fn credentials(req: CredentialsRequest) -> Result<(String, String), AppError> {
    match (req.username, req.password) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => Err(AppError::Validation("You must provide a username and a password!".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AuthFailure, repository::MemoryUserStore};

    fn service() -> (AuthService, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new("test-secret-key-for-testing-only-min-32-chars", 300).unwrap());
        let hasher = PasswordHasher::with_params(64, 1, 1).unwrap();
        let service = AuthService::new(Arc::new(MemoryUserStore::new()), tokens.clone(), hasher);
        (service, tokens)
    }

    fn creds(username: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_issues_client_token() {
        let (service, tokens) = service();

        let response = service.register(creds("alice", "pw1")).await.unwrap();
        assert_eq!(response.user.role, Role::Client);

        let claims = tokens.verify(&response.token).decode().unwrap();
        assert_eq!(claims.subject(), response.user.id.to_string());
        assert_eq!(claims.role(), Role::Client);
    }

    #[tokio::test]
    async fn test_register_duplicate_username_rejected() {
        let (service, _) = service();
        service.register(creds("alice", "pw1")).await.unwrap();

        let err = service.register(creds("alice", "pw2")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let (service, tokens) = service();
        let registered = service.register(creds("alice", "pw1")).await.unwrap();

        let response = service.authenticate(creds("alice", "pw1")).await.unwrap();
        assert_eq!(response.user.id, registered.user.id);
        assert!(tokens.verify(&response.token).is_valid());

        let err = service.authenticate(creds("alice", "wrongpw")).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(AuthFailure::WrongPassword)));
        assert_eq!(err.code(), 403);
    }

    #[tokio::test]
    async fn test_missing_fields_are_validation_errors() {
        let (service, _) = service();

        let missing_password = CredentialsRequest {
            username: Some("alice".to_string()),
            password: None,
        };
        let err = service.authenticate(missing_password).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = service.register(CredentialsRequest::default()).await.unwrap_err();
        assert_eq!(err.code(), 400);
    }
}
