//! 统一错误模型
//! 定义所有错误类型以及错误响应格式，是唯一把错误映射为 HTTP 状态码的地方

use axum::{
    extract::rejection::{BytesRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 认证失败的内部原因（对外统一为 403）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("unknown username")]
    UnknownUser,

    #[error("wrong password")]
    WrongPassword,
}

impl AuthFailure {
    /// 对外消息：令牌失败统一，凭据失败不区分用户名是否存在
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthFailure::MissingToken | AuthFailure::InvalidToken => {
                "You are not authorized to access this resource."
            }
            AuthFailure::UnknownUser | AuthFailure::WrongPassword => {
                "Wrong username or password!"
            }
        }
    }
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Authentication(AuthFailure),

    #[error("Access denied: {0}")]
    Authorization(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            // 认证与授权共用 403，但内部保持为两种错误
            AppError::Authentication(_) | AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Authentication(reason) => reason.public_message().to_string(),
            AppError::Authorization(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::PayloadTooLarge(_) => "Request body is too large!".to_string(),
            AppError::Database(_) => "Database error occurred".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }
}

/// 错误响应 DTO
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 记录错误日志
        match &self {
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                tracing::error!(code = self.code(), error = %self, "Application error");
            }
            AppError::Authentication(reason) => {
                tracing::debug!(reason = %reason, "Authentication rejected");
            }
            AppError::Authorization(_) => {
                tracing::warn!(error = %self, "Authorization rejected");
            }
            _ => {
                tracing::debug!(code = self.code(), error = %self, "Request rejected");
            }
        }

        let body = ErrorResponse {
            message: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

/// 读取请求体失败：超出上限为 413，其余为 400
impl From<BytesRejection> for AppError {
    fn from(e: BytesRejection) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::Validation(e.body_text())
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

/// 从 validator 的校验错误转换，取字段名排序后的第一条消息
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.keys().collect();
        fields.sort();

        let message = fields
            .first()
            .and_then(|field| {
                field_errors.get(*field).and_then(|errs| errs.first()).map(|err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .unwrap_or_else(|| "Invalid request".to_string());

        AppError::Validation(message)
    }
}
