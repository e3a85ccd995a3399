//! 资源加载器
//!
//! 按声明顺序逐个把路由参数解析为模型实例。scoped 参数依赖前一个参数已加载的实例，
//! 因此查找严格串行执行，每次查找完成后才开始下一次。
//!
//! 查找优先级（先命中者生效）：
//!
//! 1. 模型的 [`FindForRequest`](crate::model::FindForRequest)（scoped 参数为父实例的
//!    [`FindRelatedForRequest`](crate::model::FindRelatedForRequest)）
//! 2. 路由上指定的查找键，例如 `:post(slug)`
//! 3. 模型的 [`route_lookup_key`](crate::model::RouteModel::route_lookup_key)
//! 4. 主键

use std::sync::Arc;

use crate::context::HttpContext;
use crate::error::{BindingError, BindingResult};
use crate::model::{ModelRow, Resource, RouteModel};
use crate::params::{Param, ParamsParser};
use crate::registry::ModelSlot;
use crate::resources::ResourceMap;
use crate::utils::naming::{pluralize, to_camel_case};

/// 资源加载器
pub struct ResourceLoader<'a> {
    ctx: &'a mut HttpContext,
    resources: ResourceMap,
    rewrite_params: bool,
}

impl<'a> ResourceLoader<'a> {
    pub fn new(ctx: &'a mut HttpContext) -> Self {
        Self {
            ctx,
            resources: ResourceMap::new(),
            rewrite_params: true,
        }
    }

    /// 是否在加载完成后把原始参数表改写为规范名称
    pub fn rewrite_params(mut self, enabled: bool) -> Self {
        self.rewrite_params = enabled;
        self
    }

    /// 已加载的资源
    pub fn resources(&self) -> &ResourceMap {
        &self.resources
    }

    pub fn into_resources(self) -> ResourceMap {
        self.resources
    }

    /// 解析当前路由的参数
    ///
    /// 没有匹配路由时返回空列表
    pub fn parse(&self) -> BindingResult<Vec<Param>> {
        match &self.ctx.route {
            Some(route) => ParamsParser::new(route.params(), route.pattern()).parse(),
            None => Ok(Vec::new()),
        }
    }

    /// 按位置把槽位与路由参数配对并加载
    ///
    /// 任何错误都会中止剩余的加载，已加载的部分由调用方丢弃
    pub async fn load(&mut self, slots: &[ModelSlot]) -> BindingResult<()> {
        let params = self.parse()?;

        for (index, param) in params.iter().enumerate() {
            let Some(model) = slots.get(index).and_then(ModelSlot::as_model) else {
                tracing::debug!(param = %param.name, "No model bound to route param, skipping");
                continue;
            };

            let Some(value) = self.ctx.params.get(&param.param).map(str::to_string) else {
                tracing::debug!(
                    param = %param.name,
                    null = self.ctx.params.is_null(&param.param),
                    "Route param has no value, skipping"
                );
                continue;
            };

            let resource = if param.scoped {
                self.instantiate_scoped_model(model, param, &value).await?
            } else {
                self.instantiate_model(model, param, &value).await?
            };

            tracing::debug!(
                param = %param.name,
                model = model.name(),
                scoped = param.scoped,
                "Loaded route resource"
            );
            self.resources.insert(param.name.clone(), resource);
        }

        if self.rewrite_params {
            self.ctx.params.normalize(&params);
        }

        Ok(())
    }

    async fn instantiate_model(
        &self,
        model: &Arc<dyn RouteModel>,
        param: &Param,
        value: &str,
    ) -> BindingResult<Resource> {
        if let Some(finder) = model.request_finder() {
            return finder.find_for_request(&*self.ctx, param, value).await;
        }

        if let Some(key) = param.lookup_key.attribute() {
            return model.find_by_or_fail(key, value).await;
        }

        if let Some(key) = model.route_lookup_key() {
            return model.find_by_or_fail(key, value).await;
        }

        model.find_or_fail(value).await
    }

    async fn instantiate_scoped_model(
        &self,
        model: &Arc<dyn RouteModel>,
        param: &Param,
        value: &str,
    ) -> BindingResult<Resource> {
        let parent = param
            .parent
            .as_deref()
            .and_then(|name| self.resources.get(name))
            .cloned()
            .ok_or_else(|| BindingError::MissingParentResource {
                param: param.name.clone(),
                parent: param.parent.clone().unwrap_or_default(),
                route: self.route_pattern().to_string(),
            })?;

        if let Some(finder) = parent.related_finder() {
            return finder.find_related_for_request(&*self.ctx, param, value).await;
        }

        let relation = self.relationship_name(param, &*parent)?;
        let query = parent.related(&relation)?;

        let column = param
            .lookup_key
            .attribute()
            .or_else(|| model.route_lookup_key())
            .unwrap_or_else(|| model.primary_key());

        tracing::debug!(param = %param.name, relation = %relation, column, "Querying related resource");
        query.first_where_or_fail(column, value).await
    }

    /// 由参数名推导关联关系名称：先尝试 camelCase，再尝试复数形式
    fn relationship_name(&self, param: &Param, parent: &dyn ModelRow) -> BindingResult<String> {
        let relation = to_camel_case(&param.name);
        if parent.has_relation(&relation) {
            return Ok(relation);
        }

        let relation = pluralize(&relation);
        if parent.has_relation(&relation) {
            return Ok(relation);
        }

        Err(BindingError::MissingRelationship {
            param: param.name.clone(),
            route: self.route_pattern().to_string(),
            parent_model: parent.model_name().to_string(),
        })
    }

    fn route_pattern(&self) -> &str {
        self.ctx.route_pattern().unwrap_or_default()
    }
}
