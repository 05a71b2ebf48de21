use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 部署常用的无前缀环境变量 → 配置键
const ENV_ALIASES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis.url"),
    ("REDIS_KEY_PREFIX", "cache.redis.key_prefix"),
    ("REDIS_TTL", "cache.default_ttl"),
    ("ADMIN_ID_START", "enrollment.admin_id_start"),
];

const INSECURE_JWT_SECRET: &str = "change-me-in-production";

impl AppConfig {
    /// 加载顺序：config.toml → config.{APP_ENV}.toml → ENROLLSYS_* → 无前缀别名
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{environment}")).required(false))
            .add_source(
                Environment::with_prefix("ENROLLSYS")
                    .separator("_")
                    .try_parsing(true),
            );

        let builder = ENV_ALIASES.iter().try_fold(builder, |builder, (var, key)| {
            builder.set_override_option(*key, std::env::var(var).ok())
        })?;

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers.max(1));
        }

        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: &str| Err(ConfigError::Message(msg.to_string()));

        if self.enrollment.mis_code_max_attempts == 0 {
            return fail("enrollment.mis_code_max_attempts must be greater than 0");
        }
        if self.enrollment.admin_id_start <= 0 {
            return fail("enrollment.admin_id_start must be positive");
        }
        if self.jwt.secret.is_empty() {
            return fail("jwt.secret must not be empty");
        }
        if self.is_production() && self.jwt.secret == INSECURE_JWT_SECRET {
            return fail("jwt.secret must be changed in production");
        }
        if self.jwt.access_token_expiry <= 0 || self.jwt.refresh_token_expiry <= 0 {
            return fail("jwt token expiry must be positive");
        }
        Ok(())
    }

    /// 全局配置；尚未 `init` 时按需加载，失败则退出进程
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 启动时调用一次
    pub fn init() -> Result<(), ConfigError> {
        APP_CONFIG
            .set(Self::load()?)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 配置为空串时走 TCP
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|path| !path.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        Config::builder()
            .add_source(File::from_str(
                include_str!("../../config.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap()
    }

    #[test]
    fn test_bundled_config_is_valid() {
        let config = sample();
        assert!(config.validate().is_ok());
        assert_eq!(config.enrollment.admin_id_start, 20001);
        assert_eq!(config.server_bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_default_secret_rejected_in_production() {
        let mut config = sample();
        config.app.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.jwt.secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = sample();
        config.enrollment.mis_code_max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_socket_path_means_tcp() {
        let mut config = sample();
        assert_eq!(config.unix_socket_path(), None);
        config.server.unix_socket_path = "/tmp/enrollsys.sock".to_string();
        assert_eq!(config.unix_socket_path(), Some("/tmp/enrollsys.sock"));
    }
}
