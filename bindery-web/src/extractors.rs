//! 绑定资源提取器
//!
//! 路由模型绑定中间件把加载结果写入请求 Extension，处理器通过下面的提取器读取：
//!
//! - [`Resources`] - 按规范名称读取资源表
//! - [`BoundArguments`] - 按控制器方法声明的位置读取资源
//! - [`BoundContext`] - 完整的请求 context（改写后的参数表、匹配路由）
//!
//! 请求没有经过绑定中间件时，提取器返回 [`BindingRejection::MissingContext`]。

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use bindery_core::{downcast_resource, HttpContext, ModelRow, Resource, ResourceMap};
use std::ops::Deref;
use std::sync::Arc;

use crate::error::BindingRejection;

fn bound_context(parts: &Parts) -> Result<Arc<HttpContext>, BindingRejection> {
    parts
        .extensions
        .get::<Arc<HttpContext>>()
        .cloned()
        .ok_or(BindingRejection::MissingContext)
}

/// 资源表提取器
///
/// 用法示例：
/// ```ignore
/// async fn show_comment(resources: Resources) -> Result<Json<Comment>, BindingRejection> {
///     let comment = resources.require::<Comment>("comment")?;
///     Ok(Json(comment.as_ref().clone()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Resources(Arc<HttpContext>);

impl Resources {
    pub fn map(&self) -> &ResourceMap {
        &self.0.resources
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.0.resources.get(name)
    }

    pub fn get_as<T: ModelRow>(&self, name: &str) -> Option<Arc<T>> {
        self.0.resources.get_as::<T>(name)
    }

    /// 读取指定类型的资源，不存在或类型不匹配时返回错误
    pub fn require<T: ModelRow>(&self, name: &str) -> Result<Arc<T>, BindingRejection> {
        let resource = self
            .get(name)
            .ok_or_else(|| BindingRejection::MissingResource(name.to_string()))?;

        downcast_resource::<T>(resource).ok_or_else(|| BindingRejection::ResourceType {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    pub fn len(&self) -> usize {
        self.0.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.resources.is_empty()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Resources
where
    S: Send + Sync,
{
    type Rejection = BindingRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bound_context(parts).map(Resources)
    }
}

/// 请求 context 提取器
#[derive(Debug, Clone)]
pub struct BoundContext(pub Arc<HttpContext>);

impl Deref for BoundContext {
    type Target = HttpContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BoundContext
where
    S: Send + Sync,
{
    type Rejection = BindingRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bound_context(parts).map(BoundContext)
    }
}

/// 按声明位置排列的处理器参数（不含 context）
///
/// 被跳过的槽位和没有加载的资源不占位置
#[derive(Debug, Clone, Default)]
pub struct BoundArguments(Arc<[Resource]>);

impl BoundArguments {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self(resources.into())
    }

    pub fn get(&self, index: usize) -> Option<&Resource> {
        self.0.get(index)
    }

    /// 读取指定位置的资源并向下转型
    pub fn get_as<T: ModelRow>(&self, index: usize) -> Option<Arc<T>> {
        self.get(index).and_then(downcast_resource::<T>)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BoundArguments
where
    S: Send + Sync,
{
    type Rejection = BindingRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BoundArguments>()
            .cloned()
            .ok_or(BindingRejection::MissingContext)
    }
}
