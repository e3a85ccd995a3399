//! # Bindery Web
//!
//! 路由模型绑定的 Axum 集成
//!
//! ## 核心特性
//!
//! - **路由记录** - [`BoundRouter`] 在注册路由时记录控制器方法
//! - **资源加载** - 绑定中间件在处理器执行前加载路由资源
//! - **类型安全** - 通过提取器按名称或位置读取资源
//! - **统一错误** - 未找到返回 404，声明错误返回 500，JSON 格式

pub mod constants;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routing;
pub mod server;

pub use error::{BindingRejection, ErrorResponse};
pub use extractors::{BoundArguments, BoundContext, Resources};
pub use middleware::{request_id, request_logging, route_model_binding, BindingState};
pub use routing::{BoundRouter, HandlerTable};
pub use server::{serve, with_request_layers, ServerProperties};

pub mod prelude {
    //! 预导入模块

    pub use crate::error::*;
    pub use crate::extractors::*;
    pub use crate::middleware::*;
    pub use crate::routing::*;
    pub use crate::server::*;

    pub use axum;
    pub use axum::extract::{Json, Path, Query, State};
    pub use axum::http::StatusCode;
    pub use axum::response::{IntoResponse, Response};
    pub use axum::routing::{delete, get, patch, post, put};
    pub use axum::Router;
}
