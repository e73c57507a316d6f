//! 用户管理服务（仅管理员可达）

use super::parse_record_id;
use crate::{
    auth::PasswordHasher,
    error::AppError,
    models::user::{CreateUserRequest, Role, UpdateUserRequest, User, UserChanges, UserQuery},
    repository::UserStore,
};
use std::sync::Arc;
use validator::Validate;

const USER_NOT_FOUND: &str = "There is no user with the given ID!";

pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    /// 列出用户：按用户名或按角色过滤，二者不可同时给出；空字符串视为未给出
    pub async fn list(&self, query: UserQuery) -> Result<Vec<User>, AppError> {
        let username = query.username.filter(|s| !s.is_empty());
        let role = query.role.filter(|s| !s.is_empty());

        match (username, role) {
            (Some(_), Some(_)) => Err(AppError::Validation(
                "You must query the database based on either a username or user role.".to_string(),
            )),
            (Some(username), None) => Ok(self.users.find_by_username(&username).await?.into_iter().collect()),
            (None, Some(role)) => self.users.list(Some(role.parse::<Role>()?)).await,
            (None, None) => self.users.list(None).await,
        }
    }

    pub async fn read(&self, id: &str) -> Result<User, AppError> {
        let id = parse_record_id(id, USER_NOT_FOUND)?;

        self.users.find_by_id(id).await?.ok_or_else(not_found)
    }

    /// 创建用户，未指定角色时为 CLIENT
    pub async fn create(&self, req: CreateUserRequest) -> Result<User, AppError> {
        req.validate()?;

        let role = req.role.as_deref().map(str::parse::<Role>).transpose()?.unwrap_or_default();
        let (Some(username), Some(password)) = (req.username, req.password) else {
            return Err(AppError::Validation("Every user must have a username and a password!".to_string()));
        };

        let password_hash = self.hasher.hash(&password)?;
        let user = self.users.insert(&User::new(username, password_hash, role)).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// 更新密码和/或角色
    pub async fn update(&self, id: &str, req: UpdateUserRequest) -> Result<User, AppError> {
        if req.password.is_none() && req.role.is_none() {
            return Err(AppError::Validation(
                "You must provide at least one user attribute!".to_string(),
            ));
        }

        if req.password.as_deref() == Some("") {
            return Err(AppError::Validation("Password cannot be empty!".to_string()));
        }

        let role = req.role.as_deref().map(str::parse::<Role>).transpose()?;
        let id = parse_record_id(id, USER_NOT_FOUND)?;

        let changes = UserChanges {
            password_hash: req.password.map(|pw| self.hasher.hash(&pw)).transpose()?,
            role,
        };

        let user = self.users.update(id, &changes).await?.ok_or_else(not_found)?;
        tracing::info!(user_id = %user.id, role = %user.role, "User updated");

        Ok(user)
    }

    pub async fn delete(&self, id: &str) -> Result<User, AppError> {
        let id = parse_record_id(id, USER_NOT_FOUND)?;

        let user = self.users.delete(id).await?.ok_or_else(not_found)?;
        tracing::info!(user_id = %user.id, "User deleted");

        Ok(user)
    }

    /// 启动时确保存在一个管理员账号；已存在的同名用户保持不变
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<User, AppError> {
        if let Some(existing) = self.users.find_by_username(username).await? {
            if existing.role != Role::Admin {
                tracing::warn!(%username, "Bootstrap admin username belongs to a non-admin user");
            }
            return Ok(existing);
        }

        let password_hash = self.hasher.hash(password)?;
        let admin = self
            .users
            .insert(&User::new(username.to_string(), password_hash, Role::Admin))
            .await?;

        tracing::info!(user_id = %admin.id, %username, "Bootstrap admin created");
        Ok(admin)
    }
}

fn not_found() -> AppError {
    AppError::NotFound(USER_NOT_FOUND.to_string())
}
