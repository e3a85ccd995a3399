//! 模型契约
//!
//! 绑定层不是 ORM，只依赖下面这组能力：
//!
//! - [`RouteModel`] - 模型类型（按主键 / 按字段查找，可选的自定义查找）
//! - [`ModelRow`] - 已加载的行实例（关联查询，可选的自定义关联查找）
//! - [`RelatedQuery`] - 以父行为范围的关联查询
//!
//! 所有查找都是异步的，允许挂起等待 I/O。

use async_trait::async_trait;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use crate::context::HttpContext;
use crate::error::BindingResult;
use crate::params::Param;

/// 已加载的资源
pub type Resource = Arc<dyn ModelRow>;

/// 类型擦除辅助 trait，用于把资源向下转型为具体的行类型
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// 模型类型
///
/// 每个可绑定的模型提供一个实现（通常是持有连接池的单例）
///
/// # 示例
///
/// ```ignore
/// struct PostModel { db: Arc<Db> }
///
/// #[async_trait]
/// impl RouteModel for PostModel {
///     fn name(&self) -> &str { "Post" }
///
///     fn route_lookup_key(&self) -> Option<&str> { Some("slug") }
///
///     async fn find_or_fail(&self, value: &str) -> BindingResult<Resource> {
///         self.find_by_or_fail("id", value).await
///     }
///
///     async fn find_by_or_fail(&self, column: &str, value: &str) -> BindingResult<Resource> {
///         self.db.posts().first_where(column, value).await?
///             .map(|row| Arc::new(row) as Resource)
///             .ok_or_else(|| BindingError::not_found("Post", column, value))
///     }
/// }
/// ```
#[async_trait]
pub trait RouteModel: Send + Sync + 'static {
    /// 模型名称，用于错误信息
    fn name(&self) -> &str;

    /// 主键字段
    fn primary_key(&self) -> &str {
        "id"
    }

    /// 模型级别的默认查找字段
    fn route_lookup_key(&self) -> Option<&str> {
        None
    }

    /// 自定义的请求级查找，存在时完全接管查找逻辑
    fn request_finder(&self) -> Option<&dyn FindForRequest> {
        None
    }

    /// 按主键查找，找不到时返回 [`BindingError::NotFound`](crate::BindingError::NotFound)
    async fn find_or_fail(&self, value: &str) -> BindingResult<Resource>;

    /// 按字段查找，找不到时返回 [`BindingError::NotFound`](crate::BindingError::NotFound)
    async fn find_by_or_fail(&self, column: &str, value: &str) -> BindingResult<Resource>;
}

/// 已加载的行实例
pub trait ModelRow: AsAny + Debug {
    /// 所属模型名称
    fn model_name(&self) -> &str;

    /// 是否声明了指定名称的关联关系
    fn has_relation(&self, name: &str) -> bool;

    /// 以当前行为范围的关联查询
    fn related(&self, relation: &str) -> BindingResult<Box<dyn RelatedQuery>>;

    /// 自定义的关联资源查找，存在时完全接管 scoped 参数的查找逻辑
    fn related_finder(&self) -> Option<&dyn FindRelatedForRequest> {
        None
    }
}

impl dyn ModelRow {
    /// 向下转型为具体的行类型
    pub fn downcast_ref<T: ModelRow>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: ModelRow>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// 关联查询
#[async_trait]
pub trait RelatedQuery: Send {
    /// 返回第一条 `column = value` 的关联行，找不到时返回未找到错误
    async fn first_where_or_fail(self: Box<Self>, column: &str, value: &str) -> BindingResult<Resource>;
}

/// 模型级别的自定义请求查找
#[async_trait]
pub trait FindForRequest: Send + Sync {
    async fn find_for_request(
        &self,
        ctx: &HttpContext,
        param: &Param,
        value: &str,
    ) -> BindingResult<Resource>;
}

/// 行级别的自定义关联资源查找
#[async_trait]
pub trait FindRelatedForRequest: Send + Sync {
    async fn find_related_for_request(
        &self,
        ctx: &HttpContext,
        param: &Param,
        value: &str,
    ) -> BindingResult<Resource>;
}

/// 把资源向下转型为具体类型的 `Arc`
pub fn downcast_resource<T: ModelRow>(resource: &Resource) -> Option<Arc<T>> {
    Arc::clone(resource).into_any().downcast::<T>().ok()
}
