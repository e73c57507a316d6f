//! 用户管理的 HTTP 处理器（路由层已限制为管理员）

use super::{Payload, QueryParams};
use crate::{
    error::AppError,
    middleware::AppState,
    models::{
        user::{CreateUserRequest, UpdateUserRequest, UserQuery, UserResponse},
        ApiResponse,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 列出用户
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_service.list(query).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(ApiResponse::new(users)))
}

/// 创建用户
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Payload(req): Payload<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.create(req).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(UserResponse::from(user)))))
}

/// 获取用户详情
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.read(&id).await?;

    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}

/// 更新用户
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Payload(req): Payload<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.update(&id, req).await?;

    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}

/// 删除用户
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.delete(&id).await?;

    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}
