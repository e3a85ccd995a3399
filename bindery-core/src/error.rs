//! 统一的错误类型
//!
//! 路由模型绑定过程中的错误分为三类：
//!
//! 1. **配置错误** - 路由或控制器声明有误（绑定原始类型、首个参数被 scope、缺少关联关系等），
//!    属于开发者错误，应尽早暴露
//! 2. **未找到错误** - 任意 "or-fail" 查询匹配到 0 行，按请求失败处理（404）
//! 3. **其他错误** - ORM 层的底层错误、启动期的日志/配置初始化错误
//!
//! 参数缺失或槽位被跳过不是错误，加载器会静默跳过。

use thiserror::Error;

use crate::utils::naming::ordinalize;

/// 绑定层结果类型
pub type BindingResult<T> = std::result::Result<T, BindingError>;

/// 路由模型绑定错误
#[derive(Error, Debug)]
pub enum BindingError {
    // ========== 配置错误 ==========
    /// 路由的第一个参数不能是 scoped 参数
    #[error("The first parameter in route \"{pattern}\" cannot be scoped")]
    ScopedFirstParam { pattern: String },

    /// 试图把原始类型（字符串、数字、布尔值等）绑定为模型
    #[error(
        "Cannot bind \"{{{type_name} Constructor}}\" as {} parameter to \"{controller}.{method}\" method. Make sure to type hint a model",
        ordinal(.position)
    )]
    InvalidBindValue {
        controller: String,
        method: String,
        /// 从 1 开始的参数序号（不含 context 参数）
        position: usize,
        type_name: String,
    },

    /// scoped 参数无法在父模型上找到对应的关联关系
    #[error("Cannot load \"{param}\" for route \"{route}\". Make sure to define it as a relationship on model \"{parent_model}\"")]
    MissingRelationship {
        param: String,
        route: String,
        parent_model: String,
    },

    /// scoped 参数的父资源没有被加载（父槽位被跳过或父参数没有值）
    #[error("Cannot load \"{param}\" for route \"{route}\". Its parent \"{parent}\" was not loaded")]
    MissingParentResource {
        param: String,
        parent: String,
        route: String,
    },

    /// 控制器声明的父控制器从未注册
    #[error("Controller \"{controller}\" extends unknown controller \"{parent}\"")]
    UnknownParent { controller: String, parent: String },

    /// 两个控制器类型使用了同一个名称
    #[error("Controller \"{0}\" is registered more than once, rename one of the controller types")]
    DuplicateController(String),

    /// 控制器继承链存在环
    #[error("Controller inheritance cycle detected: {0}")]
    InheritanceCycle(String),

    // ========== 未找到错误 ==========
    /// 查询匹配到 0 行
    #[error("Row not found: no \"{model}\" where \"{column}\" = \"{value}\"")]
    NotFound {
        model: String,
        column: String,
        value: String,
    },

    // ========== 其他错误 ==========
    /// 启动期错误（日志初始化、配置文件加载）
    #[error("Setup failed: {0}")]
    Setup(String),

    /// 模型层返回的其他错误
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn ordinal(position: &usize) -> String {
    ordinalize(*position)
}

impl BindingError {
    /// 构造未找到错误，供模型实现使用
    pub fn not_found(
        model: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            model: model.into(),
            column: column.into(),
            value: value.into(),
        }
    }

    /// 稳定的错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::ScopedFirstParam { .. } => "E_SCOPED_FIRST_PARAM",
            Self::InvalidBindValue { .. } => "E_INVALID_BIND_VALUE",
            Self::MissingRelationship { .. } => "E_MISSING_RELATIONSHIP",
            Self::MissingParentResource { .. } => "E_MISSING_PARENT_RESOURCE",
            Self::UnknownParent { .. } => "E_UNKNOWN_PARENT_CONTROLLER",
            Self::DuplicateController(_) => "E_DUPLICATE_CONTROLLER",
            Self::InheritanceCycle(_) => "E_INHERITANCE_CYCLE",
            Self::NotFound { .. } => "E_ROW_NOT_FOUND",
            Self::Setup(_) => "E_SETUP_FAILED",
            Self::Other(_) => "E_LOOKUP_FAILED",
        }
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            _ => 500,
        }
    }

    /// 是否为配置错误（开发者声明有误，不应按请求重试）
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ScopedFirstParam { .. }
                | Self::InvalidBindValue { .. }
                | Self::MissingRelationship { .. }
                | Self::MissingParentResource { .. }
                | Self::UnknownParent { .. }
                | Self::DuplicateController(_)
                | Self::InheritanceCycle(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bind_value_message() {
        let err = BindingError::InvalidBindValue {
            controller: "UsersController".to_string(),
            method: "show".to_string(),
            position: 2,
            type_name: "String".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Cannot bind \"{String Constructor}\" as 2nd parameter to \"UsersController.show\" method. Make sure to type hint a model"
        );
        assert_eq!(err.code(), "E_INVALID_BIND_VALUE");
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_missing_relationship_message() {
        let err = BindingError::MissingRelationship {
            param: "comment".to_string(),
            route: "posts/:post/comments/:>comment".to_string(),
            parent_model: "Post".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Cannot load \"comment\" for route \"posts/:post/comments/:>comment\". Make sure to define it as a relationship on model \"Post\""
        );
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_not_found_status() {
        let err = BindingError::not_found("Post", "id", "42");
        assert!(err.is_not_found());
        assert!(!err.is_configuration_error());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.code(), "E_ROW_NOT_FOUND");
    }

    #[test]
    fn test_other_errors_are_wrapped() {
        let err: BindingError = anyhow::anyhow!("connection reset").into();
        assert_eq!(err.to_string(), "connection reset");
        assert_eq!(err.status_code(), 500);
    }
}
