/// 配置键常量定义
///
/// 所有配置键集中定义在这里，确保核心、web 集成和示例读取同一组标识符

/// 是否启用路由模型绑定（默认：true）
pub const BINDERY_ENABLED: &str = "bindery.enabled";

/// 加载完成后是否把原始参数表改写为规范名称（默认：true）
pub const BINDERY_REWRITE_PARAMS: &str = "bindery.rewrite-params";

/// HTTP 错误响应是否携带诊断信息（默认：true）
pub const BINDERY_WEB_EXPOSE_ERROR_DETAILS: &str = "bindery.web.expose-error-details";

/// 日志配置键
pub const LOGGING_LEVEL: &str = "logging.level";
pub const LOGGING_FORMAT: &str = "logging.format";
pub const LOGGING_FILTER: &str = "logging.filter";
