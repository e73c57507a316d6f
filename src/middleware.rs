//! HTTP 中间件
//! 应用状态与请求追踪

use crate::{
    auth::{PasswordHasher, TokenService},
    config::AppConfig,
    error::AppError,
    repository::{NoteStore, UserStore},
    services::{AuthService, NoteService, UserService},
};
use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// 应用状态
///
/// 服务以 Arc 共享，克隆只拷贝指针
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub note_service: Arc<NoteService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// 基于存储后端组装所有服务
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        notes: Arc<dyn NoteStore>,
    ) -> Result<Self, AppError> {
        let tokens = Arc::new(TokenService::from_config(&config)?);
        let hasher = PasswordHasher::from_config(&config.security)?;

        Ok(Self {
            auth_service: Arc::new(AuthService::new(users.clone(), tokens.clone(), hasher.clone())),
            note_service: Arc::new(NoteService::new(notes)),
            user_service: Arc::new(UserService::new(users.clone(), hasher)),
            config,
            users,
            tokens,
        })
    }
}

/// 请求追踪中间件
/// 为每个请求生成 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let request_id = extract_or_generate_request_id(req.headers());
    let method = req.method().clone();
    let uri = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status();

        metrics::counter!(
            "http_requests_total",
            "method" => method.to_string(),
            "status" => status.as_u16().to_string()
        )
        .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 request_id
fn extract_or_generate_request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
