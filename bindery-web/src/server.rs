//! Web 服务器模块
//!
//! 基于 Axum 的最小启动封装

use anyhow::Context;
use axum::Router;
use bindery_core::Environment;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::constants;
use crate::middleware::{request_id, request_logging};

/// Web 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerProperties {
    /// 服务器监听地址
    pub host: String,

    /// 服务器监听端口
    pub port: u16,

    /// 是否启用请求日志
    pub enable_request_logging: bool,
}

impl Default for ServerProperties {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_request_logging: true,
        }
    }
}

impl ServerProperties {
    /// 从 Environment 加载配置
    pub fn from_environment(env: &Environment) -> Self {
        let defaults = Self::default();
        Self {
            host: env.get_string(constants::SERVER_HOST).unwrap_or(defaults.host),
            port: env
                .get_i64(constants::SERVER_PORT)
                .and_then(|port| u16::try_from(port).ok())
                .unwrap_or(defaults.port),
            enable_request_logging: env.get_bool_or(
                constants::SERVER_ENABLE_REQUEST_LOGGING,
                defaults.enable_request_logging,
            ),
        }
    }

    /// 获取服务器地址
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 为路由安装请求 ID 和请求日志中间件
pub fn with_request_layers(router: Router, properties: &ServerProperties) -> Router {
    let router = if properties.enable_request_logging {
        router.layer(axum::middleware::from_fn(request_logging))
    } else {
        router
    };
    router.layer(axum::middleware::from_fn(request_id))
}

/// 启动服务器
pub async fn serve(router: Router, properties: &ServerProperties) -> anyhow::Result<()> {
    let addr = properties.address();
    let app = with_request_layers(router, properties);

    tracing::info!("🚀 Starting Bindery Web Server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("✅ Server listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
