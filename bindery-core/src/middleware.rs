//! 路由模型绑定中间件
//!
//! 每个请求执行一次：
//!
//! 1. 在 context 上初始化空的资源表
//! 2. 没有匹配路由、处理器是内联闭包、或处理器方法没有注册绑定时，直接进入下一阶段
//! 3. 否则用注册的槽位运行 [`ResourceLoader`]，把加载结果发布到 context
//!
//! 加载失败时错误原样返回，资源表不会被发布。

use std::future::Future;
use std::sync::Arc;

use crate::config::BindingProperties;
use crate::context::HttpContext;
use crate::error::BindingResult;
use crate::loader::ResourceLoader;
use crate::registry::{BindingRegistry, HandlerArgument};
use crate::resources::ResourceMap;

/// 路由模型绑定中间件
#[derive(Debug, Clone)]
pub struct BindingMiddleware {
    registry: Arc<BindingRegistry>,
    properties: BindingProperties,
}

impl BindingMiddleware {
    pub fn new(registry: Arc<BindingRegistry>) -> Self {
        Self {
            registry,
            properties: BindingProperties::default(),
        }
    }

    pub fn with_properties(mut self, properties: BindingProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn registry(&self) -> &Arc<BindingRegistry> {
        &self.registry
    }

    pub fn properties(&self) -> &BindingProperties {
        &self.properties
    }

    /// 为当前请求加载并发布资源
    pub async fn prepare(&self, ctx: &mut HttpContext) -> BindingResult<()> {
        ctx.resources = ResourceMap::new();

        if !self.properties.enabled {
            return Ok(());
        }

        let Some(slots) = self.registry.slots_for(ctx) else {
            tracing::trace!(
                route = ctx.route_pattern().unwrap_or_default(),
                "No bindings for handler, skipping resource loading"
            );
            return Ok(());
        };

        let mut loader =
            ResourceLoader::new(ctx).rewrite_params(self.properties.rewrite_params);
        if let Err(e) = loader.load(&slots).await {
            tracing::debug!(code = e.code(), "Resource loading failed: {}", e);
            return Err(e);
        }

        let resources = loader.into_resources();
        tracing::debug!(
            route = ctx.route_pattern().unwrap_or_default(),
            resources = resources.len(),
            "Published route resources"
        );
        ctx.resources = resources;
        Ok(())
    }

    /// 加载资源后把 context 交给下一阶段
    pub async fn handle<F, Fut, T>(&self, mut ctx: HttpContext, next: F) -> BindingResult<T>
    where
        F: FnOnce(HttpContext) -> Fut,
        Fut: Future<Output = T>,
    {
        self.prepare(&mut ctx).await?;
        Ok(next(ctx).await)
    }

    /// 当前请求处理器的参数列表
    pub fn handler_arguments<'c>(
        &self,
        ctx: &'c HttpContext,
    ) -> BindingResult<Vec<HandlerArgument<'c>>> {
        self.registry.handler_arguments(ctx)
    }
}
