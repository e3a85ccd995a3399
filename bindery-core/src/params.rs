//! 路由参数解析
//!
//! 把路由上的原始参数 token 解析成结构化的 [`Param`]。解析只依赖 token 列表本身，
//! 不依赖任何请求期的值，因此对同一组 token 重复解析总是得到相同的结果。
//!
//! 支持的 token 形式：
//!
//! ```text
//! post            按主键查找
//! post(slug)      按 slug 字段查找
//! >comment        作为上一个参数的关联资源查找
//! >comment(slug)  作为上一个参数的关联资源，按 slug 字段查找
//! ```

use serde::Serialize;
use std::fmt;

use crate::error::{BindingError, BindingResult};

/// 主键查找的哨兵值
pub const PRIMARY_KEY_SENTINEL: &str = "$primaryKey";

/// scoped 参数的前缀标记
pub const SCOPE_MARKER: char = '>';

/// 查找键
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum LookupKey {
    /// 使用模型主键（未显式指定查找键时的默认值）
    PrimaryKey,
    /// 路由上显式指定的字段
    Attribute(String),
}

impl LookupKey {
    pub fn as_str(&self) -> &str {
        match self {
            LookupKey::PrimaryKey => PRIMARY_KEY_SENTINEL,
            LookupKey::Attribute(key) => key,
        }
    }

    /// 路由上显式指定的字段名
    pub fn attribute(&self) -> Option<&str> {
        match self {
            LookupKey::PrimaryKey => None,
            LookupKey::Attribute(key) => Some(key),
        }
    }

    pub fn is_primary_key(&self) -> bool {
        matches!(self, LookupKey::PrimaryKey)
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LookupKey> for String {
    fn from(key: LookupKey) -> Self {
        key.as_str().to_string()
    }
}

/// 解析后的路由参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    /// 规范名称（去掉 scope 标记和查找键后缀）
    pub name: String,
    /// 原始 token
    pub param: String,
    /// 查找键
    pub lookup_key: LookupKey,
    /// 是否作为上一个参数的关联资源加载
    pub scoped: bool,
    /// scoped 参数的父参数名称
    pub parent: Option<String>,
}

impl Param {
    /// token 是否带有别名（scope 标记或查找键后缀）
    pub fn is_aliased(&self) -> bool {
        self.name != self.param
    }
}

/// 路由参数解析器
#[derive(Debug, Clone)]
pub struct ParamsParser<'a> {
    params: &'a [String],
    route_pattern: &'a str,
}

impl<'a> ParamsParser<'a> {
    /// 创建解析器
    ///
    /// `route_pattern` 只用于错误信息
    pub fn new(params: &'a [String], route_pattern: &'a str) -> Self {
        Self {
            params,
            route_pattern,
        }
    }

    /// 解析所有参数并建立父子关系
    pub fn parse(&self) -> BindingResult<Vec<Param>> {
        let params = self.params.iter().map(|token| parse_param(token)).collect();
        self.compute_param_parents(params)
    }

    fn compute_param_parents(&self, mut params: Vec<Param>) -> BindingResult<Vec<Param>> {
        for index in 0..params.len() {
            if !params[index].scoped {
                continue;
            }

            if index == 0 {
                return Err(BindingError::ScopedFirstParam {
                    pattern: self.route_pattern.to_string(),
                });
            }

            params[index].parent = Some(params[index - 1].name.clone());
        }

        Ok(params)
    }
}

fn parse_param(token: &str) -> Param {
    let (name, lookup_key) = match token.split_once('(') {
        Some((name, rest)) => {
            // 去掉结尾的 ")"
            let key = rest.strip_suffix(')').unwrap_or(rest);
            (name, LookupKey::Attribute(key.to_string()))
        }
        None => (token, LookupKey::PrimaryKey),
    };

    let (name, scoped) = match name.strip_prefix(SCOPE_MARKER) {
        Some(stripped) => (stripped, true),
        None => (name, false),
    };

    Param {
        name: name.to_string(),
        param: token.to_string(),
        lookup_key,
        scoped,
        parent: None,
    }
}
