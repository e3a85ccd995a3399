// bindery-core: 路由模型绑定
//
// 在控制器方法执行前，把路由参数解析为已加载的模型实例：
// - 参数解析（查找键、scoped 参数、父子关系）
// - 控制器方法的模型槽位注册（隐式 / 显式，支持继承）
// - 按优先级逐个加载资源，scoped 参数通过父实例的关联关系查找
// - 请求级中间件：加载、发布资源表、组装处理器参数

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod loader;
pub mod logging;
pub mod middleware;
pub mod model;
pub mod params;
pub mod registry;
pub mod resources;
pub mod route;
pub mod utils;

// 重新导出常用类型
pub use config::{
    BindingProperties, ConfigValue, Environment, EnvironmentPropertySource, MapPropertySource,
    PropertySource, TomlPropertySource,
};
pub use context::HttpContext;
pub use error::{BindingError, BindingResult};
pub use loader::ResourceLoader;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use middleware::BindingMiddleware;
pub use model::{
    downcast_resource, AsAny, FindForRequest, FindRelatedForRequest, ModelRow, RelatedQuery,
    Resource, RouteModel,
};
pub use params::{LookupKey, Param, ParamsParser, PRIMARY_KEY_SENTINEL};
pub use registry::{
    BindTarget, BindingRegistry, Controller, ControllerBindingRegistration, HandlerArgument,
    MethodBindings, ModelSlot, SlotHint,
};
pub use resources::ResourceMap;
pub use route::{HandlerDescriptor, RouteMatch, RouteParams};

// 导出 async_trait 和 inventory，供宏使用
pub use async_trait;
pub use inventory;

/// Prelude 模块，包含常用的 traits 和类型
pub mod prelude {
    pub use crate::context::HttpContext;
    pub use crate::error::{BindingError, BindingResult};
    pub use crate::middleware::BindingMiddleware;
    pub use crate::model::{
        FindForRequest, FindRelatedForRequest, ModelRow, RelatedQuery, Resource, RouteModel,
    };
    pub use crate::registry::{BindTarget, BindingRegistry, Controller, ModelSlot, SlotHint};
    pub use crate::resources::ResourceMap;
    pub use crate::route::{HandlerDescriptor, RouteMatch, RouteParams};

    pub use async_trait::async_trait;
}
