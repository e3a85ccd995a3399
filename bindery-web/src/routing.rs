//! 记录处理器描述的路由构建器
//!
//! axum 的路由表不暴露处理器是哪个控制器的哪个方法，
//! 因此由 [`BoundRouter`] 在注册路由时同时记录 `(method, path) -> HandlerDescriptor`，
//! 绑定中间件用匹配到的路由模式查这张表。

use axum::{
    handler::Handler,
    http::Method,
    routing::{self, MethodRouter},
    Router,
};
use bindery_core::{BindingMiddleware, Controller, HandlerDescriptor};
use std::collections::HashMap;
use std::sync::Arc;

use crate::middleware::{route_model_binding, BindingState};

/// 路由模式到处理器描述的映射
#[derive(Debug, Clone, Default)]
pub struct HandlerTable {
    routes: HashMap<String, HashMap<Method, HandlerDescriptor>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, method: Method, path: impl Into<String>, handler: HandlerDescriptor) {
        self.routes
            .entry(path.into())
            .or_default()
            .insert(method, handler);
    }

    /// 查找处理器描述，HEAD 请求回退到 GET，未记录的路由视为内联闭包
    pub fn resolve(&self, method: &Method, path: &str) -> HandlerDescriptor {
        let Some(methods) = self.routes.get(path) else {
            return HandlerDescriptor::Function;
        };

        methods
            .get(method)
            .or_else(|| (method == Method::HEAD).then(|| methods.get(&Method::GET)).flatten())
            .cloned()
            .unwrap_or(HandlerDescriptor::Function)
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 路由构建器
///
/// # 示例
///
/// ```ignore
/// let app = BoundRouter::new()
///     .get::<PostsController, _, _>("/posts/:post(slug)", "show", show_post)
///     .get::<CommentsController, _, _>("/posts/:post(slug)/comments/:>comment", "show", show_comment)
///     .inline("/health", get(|| async { "ok" }))
///     .into_router(BindingMiddleware::new(registry));
/// ```
pub struct BoundRouter<S = ()> {
    router: Router<S>,
    handlers: HandlerTable,
}

impl<S> Default for BoundRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> BoundRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            handlers: HandlerTable::new(),
        }
    }

    /// 注册控制器方法路由
    pub fn route_bound<C: Controller>(
        mut self,
        method: Method,
        path: &str,
        action: &str,
        method_router: MethodRouter<S>,
    ) -> Self {
        tracing::debug!(
            method = %method,
            path,
            controller = C::CONTROLLER_NAME,
            action,
            "Registered bound route"
        );
        self.handlers.insert(
            method,
            path,
            HandlerDescriptor::bound(C::CONTROLLER_NAME, action),
        );
        self.router = self.router.route(path, method_router);
        self
    }

    pub fn get<C, H, T>(self, path: &str, action: &str, handler: H) -> Self
    where
        C: Controller,
        H: Handler<T, S>,
        T: 'static,
    {
        self.route_bound::<C>(Method::GET, path, action, routing::get(handler))
    }

    pub fn post<C, H, T>(self, path: &str, action: &str, handler: H) -> Self
    where
        C: Controller,
        H: Handler<T, S>,
        T: 'static,
    {
        self.route_bound::<C>(Method::POST, path, action, routing::post(handler))
    }

    pub fn put<C, H, T>(self, path: &str, action: &str, handler: H) -> Self
    where
        C: Controller,
        H: Handler<T, S>,
        T: 'static,
    {
        self.route_bound::<C>(Method::PUT, path, action, routing::put(handler))
    }

    pub fn patch<C, H, T>(self, path: &str, action: &str, handler: H) -> Self
    where
        C: Controller,
        H: Handler<T, S>,
        T: 'static,
    {
        self.route_bound::<C>(Method::PATCH, path, action, routing::patch(handler))
    }

    pub fn delete<C, H, T>(self, path: &str, action: &str, handler: H) -> Self
    where
        C: Controller,
        H: Handler<T, S>,
        T: 'static,
    {
        self.route_bound::<C>(Method::DELETE, path, action, routing::delete(handler))
    }

    /// 注册内联闭包路由，不做资源加载
    pub fn inline(mut self, path: &str, method_router: MethodRouter<S>) -> Self {
        self.router = self.router.route(path, method_router);
        self
    }

    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    /// 安装绑定中间件并返回 axum 路由
    ///
    /// 中间件以 route layer 的形式安装，只对匹配到的路由生效
    pub fn into_router(self, middleware: BindingMiddleware) -> Router<S> {
        tracing::info!(
            "✅ Route model binding installed for {} bound routes",
            self.handlers.len()
        );

        let state = BindingState::new(Arc::new(middleware), Arc::new(self.handlers));
        self.router
            .route_layer(axum::middleware::from_fn_with_state(state, route_model_binding))
    }
}
