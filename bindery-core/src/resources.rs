//! 请求级资源表

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{downcast_resource, ModelRow, Resource};

/// 已加载的资源，按参数的规范名称索引
#[derive(Debug, Clone, Default)]
pub struct ResourceMap {
    entries: HashMap<String, Resource>,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, resource: Resource) -> Option<Resource> {
        self.entries.insert(name.into(), resource)
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.entries.get(name)
    }

    /// 获取资源并转型为具体的行类型
    pub fn get_as<T: ModelRow>(&self, name: &str) -> Option<Arc<T>> {
        self.entries.get(name).and_then(downcast_resource::<T>)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
