//! 数据模型模块

pub mod auth;
pub mod note;
pub mod user;

use serde::Serialize;

/// 成功响应信封: `{ "data": ... }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
