//! 认证相关的 HTTP 处理器

use super::Payload;
use crate::{
    error::AppError,
    middleware::AppState,
    models::{auth::CredentialsRequest, ApiResponse},
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    Payload(req): Payload<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.register(req).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(response))))
}

/// 登录
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    Payload(req): Payload<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.authenticate(req).await?;

    Ok(Json(ApiResponse::new(response)))
}
