//! 对象缓存
//!
//! 后端以插件形式注册（moka / redis），启动时按配置选择。
//! 值以 JSON 字符串存储，类型化读写由 `ObjectCacheExt` 提供。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错或值无法解析
    ExistsButNoValue,
}

impl<T> CacheResult<T> {
    pub fn found(self) -> Option<T> {
        match self {
            CacheResult::Found(value) => Some(value),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用后端默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 类型化读写
#[async_trait]
pub trait ObjectCacheExt: ObjectCache {
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> CacheResult<T> {
        match self.get_raw(key).await {
            CacheResult::Found(raw) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => CacheResult::Found(value),
                Err(e) => {
                    warn!("Failed to decode cached value for '{}': {}", key, e);
                    CacheResult::ExistsButNoValue
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    async fn insert_json<T: Serialize + Sync>(&self, key: String, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(raw) => self.insert_raw(key, raw, ttl).await,
            Err(e) => warn!("Failed to encode value for cache key '{}': {}", key, e),
        }
    }
}

impl<C: ObjectCache + ?Sized> ObjectCacheExt for C {}

/// 声明缓存插件，进程启动时自动注册到插件表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        <$ty>::new()
                            .map(|cache| Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                            .map_err(|e| {
                                $crate::errors::EnrollSysError::cache_connection(format!(
                                    "{} cache init failed: {e}",
                                    $name
                                ))
                            })
                    }) as $crate::cache::register::BoxedObjectCacheFuture
                }),
            );
        }
    };
}

/// 缓存键
pub mod keys {
    use crate::models::catalog::entities::{Semester, YearLevel};

    pub fn principal(user_id: i64) -> String {
        format!("principal:{user_id}")
    }

    pub fn course_list(year_level: Option<YearLevel>, semester: Option<Semester>) -> String {
        format!(
            "courses:{}:{}",
            year_level.map(|y| y.as_str()).unwrap_or("*"),
            semester.map(|s| s.as_str()).unwrap_or("*")
        )
    }

    /// 课程创建后需要失效的全部列表键
    pub fn course_list_variants(year_level: YearLevel, semester: Semester) -> Vec<String> {
        vec![
            course_list(Some(year_level), Some(semester)),
            course_list(Some(year_level), None),
            course_list(None, Some(semester)),
            course_list(None, None),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::entities::{Semester, YearLevel};

    #[test]
    fn test_course_list_keys() {
        assert_eq!(
            keys::course_list(Some(YearLevel::First), Some(Semester::Second)),
            "courses:First Year:Second Semester"
        );
        assert_eq!(keys::course_list(None, None), "courses:*:*");
        assert_eq!(
            keys::course_list_variants(YearLevel::Third, Semester::First).len(),
            4
        );
    }

    #[test]
    fn test_cache_result_found() {
        assert_eq!(CacheResult::Found(3).found(), Some(3));
        assert_eq!(CacheResult::<i32>::NotFound.found(), None);
    }
}
