//! HTTP 错误映射
//!
//! 绑定失败和提取器失败都转换为统一的 JSON 错误响应：
//!
//! ```json
//! {
//!   "timestamp": "2024-01-01T00:00:00Z",
//!   "status": 404,
//!   "error": "Not Found",
//!   "code": "E_ROW_NOT_FOUND",
//!   "message": "Row not found: no \"Post\" where \"id\" = \"42\"",
//!   "path": "/posts/42"
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bindery_core::BindingError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// 请求处理中的绑定错误
#[derive(Debug, Error)]
pub enum BindingRejection {
    /// 资源加载失败
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// 路径参数无法解码（例如百分号解码后不是合法的 UTF-8）
    #[error("Invalid route parameter: {0}")]
    InvalidRouteParams(String),

    /// 路由没有经过绑定中间件
    #[error("Route model binding did not run for this route")]
    MissingContext,

    /// 处理器要求的资源没有被加载
    #[error("Resource \"{0}\" was not loaded for this request")]
    MissingResource(String),

    /// 资源的实际类型与要求的类型不一致
    #[error("Resource \"{name}\" is not a {expected}")]
    ResourceType { name: String, expected: &'static str },
}

impl BindingRejection {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Binding(error) => StatusCode::from_u16(error.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::InvalidRouteParams(_) => StatusCode::BAD_REQUEST,
            Self::MissingResource(_) => StatusCode::NOT_FOUND,
            Self::MissingContext | Self::ResourceType { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 稳定的错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Binding(error) => error.code(),
            Self::InvalidRouteParams(_) => "E_INVALID_ROUTE_PARAM",
            Self::MissingContext => "E_BINDING_NOT_APPLIED",
            Self::MissingResource(_) => "E_RESOURCE_NOT_LOADED",
            Self::ResourceType { .. } => "E_RESOURCE_TYPE_MISMATCH",
        }
    }

    /// 构建错误响应
    ///
    /// `expose_details` 为 false 时只返回状态码的标准描述
    pub fn to_error_response(&self, path: &str, expose_details: bool) -> ErrorResponse {
        let status = self.status_code();
        let message = if expose_details {
            self.to_string()
        } else {
            status.canonical_reason().unwrap_or("Unknown Error").to_string()
        };
        ErrorResponse::new(status, self.code(), message, path)
    }
}

/// 将错误同时存放在响应的 Extension 中，绑定中间件据此补全请求路径
impl IntoResponse for BindingRejection {
    fn into_response(self) -> Response {
        let mut response = self.to_error_response("unknown", true).into_response();
        response.extensions_mut().insert(Arc::new(self));
        response
    }
}

/// 统一的错误响应格式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub code: String,
    pub message: String,
    pub path: String,
}

impl ErrorResponse {
    pub fn new(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown Error").to_string(),
            code: code.into(),
            message: message.into(),
            path: path.into(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
