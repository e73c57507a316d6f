//! 健康检查处理器
//! 提供 / 和 /health 端点

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{db::HealthStatus, middleware::AppState, models::ApiResponse};

/// 存活探针响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
}

/// 根路径横幅
pub async fn banner() -> &'static str {
    "QuickNote API!"
}

/// 存活探针，附带存储检查
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthResponse>> {
    let storage = state.users.health_check().await;

    let (status, storage) = match storage {
        HealthStatus::Healthy => ("ok", "healthy"),
        HealthStatus::Unhealthy(_) => ("degraded", "unhealthy"),
    };

    Json(ApiResponse::new(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: storage.to_string(),
    }))
}
