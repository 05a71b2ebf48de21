use crate::cache::{
    ObjectCache,
    register::{get_object_cache_plugin, registered_plugins},
};
use crate::config::AppConfig;
use crate::errors::{EnrollSysError, Result};
use crate::models::users::requests::CreateAdminRequest;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

const FALLBACK_CACHE: &str = "moka";
const DEFAULT_ADMIN_DOB: &str = "2000-01-01";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        EnrollSysError::cache_plugin_not_found(format!(
            "Cache backend '{name}' not registered (available: {})",
            registered_plugins().join(", ")
        ))
    })?;
    Ok(Arc::from(constructor().await?))
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != FALLBACK_CACHE => {
            warn!("Failed to create {} cache: {}", cache_type, e);
            warn!("Falling back to Moka (in-memory) cache");
            build_cache(FALLBACK_CACHE).await
        }
        Err(e) => Err(e),
    }
}

/// 从环境变量构造默认管理员，缺省值会打印警告
pub fn default_admin_request<F>(lookup: F) -> CreateAdminRequest
where
    F: Fn(&str) -> Option<String>,
{
    let mut defaulted = Vec::new();
    let mut read = |key: &'static str, fallback: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| {
                defaulted.push(key);
                fallback.to_string()
            })
    };

    let first_name = read("ADMIN_FIRST_NAME", "System");
    let last_name = read("ADMIN_LAST_NAME", "Administrator");
    let email = read("ADMIN_EMAIL", "admin@localhost.localdomain");
    let date_of_birth = read("ADMIN_DOB", DEFAULT_ADMIN_DOB);

    let date_of_birth = chrono::NaiveDate::parse_from_str(&date_of_birth, "%Y-%m-%d")
        .unwrap_or_else(|_| {
            warn!("ADMIN_DOB '{}' is not YYYY-MM-DD, using {}", date_of_birth, DEFAULT_ADMIN_DOB);
            chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
        });

    if !defaulted.is_empty() {
        warn!("==========================================================");
        warn!("  DEFAULT ADMIN USES DEVELOPMENT VALUES FOR:");
        warn!("  {}", defaulted.join(", "));
        warn!("  Set these variables before deploying to production");
        warn!("==========================================================");
    }

    CreateAdminRequest {
        first_name,
        last_name,
        date_of_birth,
        email,
    }
}

/// 没有任何管理员时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_admins().await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} admin(s), skipping admin seed", count);
            return;
        }
        Ok(_) => info!("No admin found in database, creating default admin account..."),
        Err(e) => {
            warn!("Failed to count admins: {}, skipping admin seed", e);
            return;
        }
    }

    let request = default_admin_request(|key| std::env::var(key).ok());
    match storage.create_admin(request).await {
        Ok(admin) => warn!(
            "Default admin account created (ID: {}, date of birth: {})",
            admin.id, admin.date_of_birth
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_admin_from_env() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ADMIN_FIRST_NAME", "Ana"),
            ("ADMIN_LAST_NAME", "Reyes"),
            ("ADMIN_DOB", "1990-02-14"),
            ("ADMIN_EMAIL", "ana@school.edu"),
        ]);
        let req = default_admin_request(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(req.first_name, "Ana");
        assert_eq!(req.email, "ana@school.edu");
        assert_eq!(
            req.date_of_birth,
            chrono::NaiveDate::from_ymd_opt(1990, 2, 14).unwrap()
        );
    }

    #[test]
    fn test_default_admin_fallbacks() {
        let req = default_admin_request(|k| (k == "ADMIN_DOB").then(|| "14/02/1990".to_string()));
        assert_eq!(req.first_name, "System");
        assert_eq!(
            req.date_of_birth,
            chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
    }
}
