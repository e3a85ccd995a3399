//! Web 集成配置常量定义

// ==================== Server 配置 ====================

/// 服务器监听地址
pub const SERVER_HOST: &str = "server.host";

/// 服务器监听端口
pub const SERVER_PORT: &str = "server.port";

/// 是否启用请求日志
pub const SERVER_ENABLE_REQUEST_LOGGING: &str = "server.enable-request-logging";

// ==================== Header ====================

/// 请求 ID 响应头
pub const REQUEST_ID_HEADER: &str = "x-request-id";
