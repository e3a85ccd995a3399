//! 请求上下文
//!
//! 绑定层在请求期间读写的所有状态：匹配到的路由、原始参数表、已加载的资源。

use crate::resources::ResourceMap;
use crate::route::{RouteMatch, RouteParams};

/// 请求上下文
#[derive(Debug, Clone, Default)]
pub struct HttpContext {
    /// 匹配到的路由，未匹配时为 `None`
    pub route: Option<RouteMatch>,
    /// 原始参数表，加载完成后被改写为规范名称
    pub params: RouteParams,
    /// 已加载的资源
    pub resources: ResourceMap,
}

impl HttpContext {
    pub fn new(route: RouteMatch, params: RouteParams) -> Self {
        Self {
            route: Some(route),
            params,
            resources: ResourceMap::new(),
        }
    }

    /// 没有匹配路由的上下文
    pub fn unrouted(params: RouteParams) -> Self {
        Self {
            route: None,
            params,
            resources: ResourceMap::new(),
        }
    }

    pub fn route_pattern(&self) -> Option<&str> {
        self.route.as_ref().map(RouteMatch::pattern)
    }
}
