//! 笔记的 HTTP 处理器
//! 调用者身份一律来自令牌，从不取自请求体

use super::{Payload, QueryParams};
use crate::{
    auth::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{
        note::{CreateNoteRequest, NoteQuery, UpdateNoteRequest},
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

/// 列出当前用户的笔记
pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    QueryParams(query): QueryParams<NoteQuery>,
) -> Result<impl IntoResponse, AppError> {
    let notes = state
        .note_service
        .list(&auth_context.subject, query.query.as_deref())
        .await?;

    Ok(Json(ApiResponse::new(notes)))
}

/// 创建笔记
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Payload(req): Payload<CreateNoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let note = state.note_service.create(req, &auth_context.subject).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(note))))
}

/// 获取笔记
pub async fn get_note(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let note = state.note_service.read(&auth_context.subject, &id).await?;

    Ok(Json(ApiResponse::new(note)))
}

/// 更新笔记
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<String>,
    Payload(req): Payload<UpdateNoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let note = state.note_service.update(&auth_context.subject, &id, req).await?;

    Ok(Json(ApiResponse::new(note)))
}

/// 删除笔记
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let note = state.note_service.delete(&auth_context.subject, &id).await?;

    Ok(Json(ApiResponse::new(note)))
}
