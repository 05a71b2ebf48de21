//! 缓存插件注册表
//!
//! 各后端通过 `declare_object_cache_plugin!` 在进程启动时登记构造函数，
//! 启动流程按 `cache.type` 取出并构造。

use crate::cache::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, PoisonError, RwLock},
};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

static PLUGINS: Lazy<RwLock<HashMap<&'static str, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_object_cache_plugin(name: &'static str, constructor: ObjectCacheConstructor) {
    PLUGINS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name, constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    PLUGINS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

/// 已登记的后端名称（按字母排序）
pub fn registered_plugins() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = PLUGINS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .copied()
        .collect();
    names.sort_unstable();
    names
}

pub fn debug_object_cache_registry() {
    let names = registered_plugins();
    if names.is_empty() {
        tracing::debug!("No object cache plugins registered");
    } else {
        tracing::debug!("Registered object cache plugins: {}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_backends_are_registered() {
        let names = registered_plugins();
        assert!(names.contains(&"moka"));
        assert!(names.contains(&"redis"));
        assert!(get_object_cache_plugin("memcached").is_none());
    }
}
