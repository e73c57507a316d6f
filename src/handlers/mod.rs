//! HTTP 处理器模块

pub mod auth;
pub mod health;
pub mod note;
pub mod user;

use crate::error::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// JSON 请求体提取器
///
/// 空请求体视为所有字段缺失（`T::default()`），由业务校验给出具体字段的 400；
/// 无法解析的 JSON 同样返回 400，超出大小上限返回 413。
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(Payload)
            .map_err(|e| AppError::Validation(format!("Invalid JSON body: {}", e)))
    }
}

/// 查询字符串提取器，解析失败以统一错误格式返回 400
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(QueryParams(value))
    }
}
