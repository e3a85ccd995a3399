//! 中间件模块
//!
//! - [`route_model_binding`] - 路由模型绑定，在处理器执行前加载资源
//! - [`request_logging`] - 请求日志
//! - [`request_id`] - 请求 ID

use axum::{
    extract::{rejection::RawPathParamsRejection, MatchedPath, RawPathParams, Request, State},
    http::{HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bindery_core::{
    BindingError, BindingMiddleware, HandlerArgument, HttpContext, Resource, RouteMatch,
    RouteParams,
};
use std::{sync::Arc, time::Instant};

use crate::constants::REQUEST_ID_HEADER;
use crate::error::BindingRejection;
use crate::extractors::BoundArguments;
use crate::routing::HandlerTable;

/// 绑定中间件的共享状态
#[derive(Debug, Clone)]
pub struct BindingState {
    middleware: Arc<BindingMiddleware>,
    handlers: Arc<HandlerTable>,
}

impl BindingState {
    pub fn new(middleware: Arc<BindingMiddleware>, handlers: Arc<HandlerTable>) -> Self {
        Self {
            middleware,
            handlers,
        }
    }

    pub fn middleware(&self) -> &BindingMiddleware {
        &self.middleware
    }

    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    /// 用匹配到的路由和原始参数构建请求 context
    pub fn build_context(
        &self,
        method: &Method,
        matched_path: Option<&MatchedPath>,
        params: RouteParams,
    ) -> HttpContext {
        match matched_path {
            Some(matched) => {
                let pattern = matched.as_str();
                let handler = self.handlers.resolve(method, pattern);
                HttpContext::new(RouteMatch::new(pattern, handler), params)
            }
            None => HttpContext::unrouted(params),
        }
    }
}

/// 路由模型绑定中间件
///
/// 加载成功后向请求 Extension 写入 `Arc<HttpContext>`、[`BoundArguments`]
/// 和 `BindingProperties`，供提取器读取。加载失败时不调用处理器，直接返回错误响应；
/// 路径参数无法解码时返回 400。
pub async fn route_model_binding(
    State(state): State<BindingState>,
    method: Method,
    matched_path: Option<MatchedPath>,
    raw_params: Result<RawPathParams, RawPathParamsRejection>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let properties = *state.middleware().properties();

    let params: RouteParams = match raw_params {
        Ok(raw) => raw.iter().collect(),
        Err(RawPathParamsRejection::MissingPathParams(_)) => RouteParams::new(),
        Err(rejection) => {
            tracing::warn!(path = %path, error = %rejection, "Route params could not be decoded");
            return BindingRejection::InvalidRouteParams(rejection.body_text())
                .to_error_response(&path, properties.expose_error_details)
                .into_response();
        }
    };

    let mut ctx = state.build_context(&method, matched_path.as_ref(), params);

    if let Err(error) = state.middleware().prepare(&mut ctx).await {
        log_binding_error(&error, &path);
        return BindingRejection::from(error)
            .to_error_response(&path, properties.expose_error_details)
            .into_response();
    }

    let arguments: Vec<Resource> = match state.middleware().handler_arguments(&ctx) {
        Ok(arguments) => arguments
            .iter()
            .filter_map(HandlerArgument::as_resource)
            .cloned()
            .collect(),
        Err(error) => {
            log_binding_error(&error, &path);
            return BindingRejection::from(error)
                .to_error_response(&path, properties.expose_error_details)
                .into_response();
        }
    };

    req.extensions_mut().insert(Arc::new(ctx));
    req.extensions_mut().insert(BoundArguments::new(arguments));
    req.extensions_mut().insert(properties);

    let response = next.run(req).await;

    // 提取器返回的错误没有请求路径，这里补全
    if let Some(rejection) = response.extensions().get::<Arc<BindingRejection>>() {
        tracing::debug!(
            path = %path,
            code = rejection.code(),
            "Found BindingRejection in response extensions"
        );
        return rejection
            .to_error_response(&path, properties.expose_error_details)
            .into_response();
    }

    response
}

fn log_binding_error(error: &BindingError, path: &str) {
    if error.is_configuration_error() {
        tracing::error!(path = %path, code = error.code(), "Route model binding misconfigured: {}", error);
    } else if error.is_not_found() {
        tracing::debug!(path = %path, code = error.code(), "Route resource not found: {}", error);
    } else {
        tracing::warn!(path = %path, code = error.code(), "Route model binding failed: {}", error);
    }
}

/// 请求日志中间件
pub async fn request_logging(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        elapsed = ?start.elapsed(),
        "Request completed"
    );

    response
}

/// 请求 ID 中间件
///
/// 请求已带有 `x-request-id` 时沿用，否则生成新的 UUID
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let request_id = match req.headers().get(REQUEST_ID_HEADER) {
        Some(value) => value.clone(),
        None => match HeaderValue::from_str(&uuid::Uuid::new_v4().to_string()) {
            Ok(value) => value,
            Err(_) => return next.run(req).await,
        },
    };

    req.headers_mut().insert(REQUEST_ID_HEADER, request_id.clone());

    let mut response = next.run(req).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}
