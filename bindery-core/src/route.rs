//! 路由访问契约
//!
//! 绑定层只读取匹配到的路由（模式、参数 token、处理器描述），
//! 并在加载完成后把原始参数表改写为规范名称。

use std::collections::HashMap;

use crate::params::Param;

/// 已解析的处理器描述
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandlerDescriptor {
    /// 内联闭包，不做资源加载
    Function,
    /// 控制器方法
    Bound { namespace: String, method: String },
}

impl HandlerDescriptor {
    pub fn bound(namespace: impl Into<String>, method: impl Into<String>) -> Self {
        HandlerDescriptor::Bound {
            namespace: namespace.into(),
            method: method.into(),
        }
    }

    /// 控制器方法的 (namespace, method)
    pub fn as_bound(&self) -> Option<(&str, &str)> {
        match self {
            HandlerDescriptor::Function => None,
            HandlerDescriptor::Bound { namespace, method } => Some((namespace, method)),
        }
    }
}

/// 匹配到的路由
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pattern: String,
    params: Vec<String>,
    handler: HandlerDescriptor,
}

impl RouteMatch {
    /// 从路由模式创建，参数 token 按声明顺序从模式中提取
    ///
    /// ```
    /// use bindery_core::route::{HandlerDescriptor, RouteMatch};
    ///
    /// let route = RouteMatch::new("/posts/:post(slug)/comments/:>comment", HandlerDescriptor::Function);
    /// assert_eq!(route.params(), ["post(slug)", ">comment"]);
    /// ```
    pub fn new(pattern: impl Into<String>, handler: HandlerDescriptor) -> Self {
        let pattern = pattern.into();
        let params = extract_param_tokens(&pattern);
        Self {
            pattern,
            params,
            handler,
        }
    }

    /// 覆盖参数 token 列表（框架已知 token 时使用）
    pub fn with_params(mut self, params: Vec<String>) -> Self {
        self.params = params;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn handler(&self) -> &HandlerDescriptor {
        &self.handler
    }
}

/// 从路由模式中提取参数 token
///
/// 支持 `:name`（可带 `?` 可选标记）和 `{name}` 两种写法
pub fn extract_param_tokens(pattern: &str) -> Vec<String> {
    pattern
        .split('/')
        .filter_map(|segment| {
            if let Some(token) = segment.strip_prefix(':') {
                Some(token.strip_suffix('?').unwrap_or(token))
            } else {
                segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
            }
        })
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// 请求的原始参数表
///
/// 值为 `None` 表示上游的类型转换显式地把参数置为 null；
/// 不存在的键表示参数未定义。空字符串是合法的值。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    values: HashMap<String, Option<String>>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), Some(value.into()));
    }

    /// 把参数显式置为 null
    pub fn set_null(&mut self, name: impl Into<String>) {
        self.values.insert(name.into(), None);
    }

    /// 获取参数值，未定义或为 null 时返回 `None`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_null(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(None))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// 把带别名的原始 token 改写为规范名称
    ///
    /// 对于 `name != param` 的参数（带 scope 标记或查找键后缀），
    /// 值移动到 `name` 下，原始键被删除。
    pub fn normalize(&mut self, params: &[Param]) {
        for param in params.iter().filter(|p| p.is_aliased()) {
            if let Some(value) = self.values.remove(&param.param) {
                self.values.insert(param.name.clone(), value);
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RouteParams::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamsParser;

    #[test]
    fn test_extract_param_tokens() {
        assert_eq!(extract_param_tokens("posts/:post"), vec!["post"]);
        assert_eq!(
            extract_param_tokens("/posts/:post(slug)/comments/:>comment"),
            vec!["post(slug)", ">comment"]
        );
        assert_eq!(extract_param_tokens("/users/{user}/:tab?"), vec!["user", "tab"]);
        assert!(extract_param_tokens("/about").is_empty());
    }

    #[test]
    fn test_null_and_missing_values() {
        let mut params: RouteParams = [("post", "")].into_iter().collect();
        params.set_null("comment");

        assert_eq!(params.get("post"), Some(""));
        assert_eq!(params.get("comment"), None);
        assert!(params.is_null("comment"));
        assert!(!params.is_null("tag"));
        assert!(!params.contains("tag"));
    }

    #[test]
    fn test_normalize_rekeys_aliased_tokens() {
        let tokens = vec!["post(slug)".to_string(), ">comment".to_string(), "tag".to_string()];
        let parsed = ParamsParser::new(&tokens, "/:post(slug)/:>comment/:tag")
            .parse()
            .unwrap();

        let mut params: RouteParams = [
            ("post(slug)", "hello-world"),
            (">comment", "3"),
            ("tag", "rust"),
        ]
        .into_iter()
        .collect();
        params.normalize(&parsed);

        let expected: RouteParams = [("post", "hello-world"), ("comment", "3"), ("tag", "rust")]
            .into_iter()
            .collect();
        assert_eq!(params, expected);
    }

    #[test]
    fn test_handler_descriptor() {
        let handler = HandlerDescriptor::bound("PostsController", "show");
        assert_eq!(handler.as_bound(), Some(("PostsController", "show")));
        assert_eq!(HandlerDescriptor::Function.as_bound(), None);
    }
}
