use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, warn};

use rust_enrollsys::config::{AppConfig, CorsConfig};
use rust_enrollsys::models::AppStartTime;
use rust_enrollsys::routes;
use rust_enrollsys::runtime::lifetime;
use rust_enrollsys::utils::{json_error_handler, query_error_handler};

/// 初始化日志：开发环境带文件行号，其余环境输出 JSON
fn init_tracing(config: &AppConfig) -> tracing_appender::non_blocking::WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.app.log_level))
        .with_writer(writer)
        .with_level(true);

    if config.is_development() {
        builder
            .with_ansi(true)
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        builder.json().init();
    }
    guard
}

/// 根据配置构建 CORS，"*" 表示允许任意来源
fn build_cors(cors: &CorsConfig) -> Cors {
    let mut builder = Cors::default().max_age(cors.max_age);

    if cors.allowed_origins.iter().any(|o| o == "*") {
        builder = builder.allow_any_origin();
    } else {
        for origin in &cors.allowed_origins {
            builder = builder.allowed_origin(origin);
        }
        // refresh token 走 cookie
        builder = builder.supports_credentials();
    }

    let methods: Vec<&str> = cors.allowed_methods.iter().map(String::as_str).collect();
    let headers: Vec<&str> = cors.allowed_headers.iter().map(String::as_str).collect();
    builder.allowed_methods(methods).allowed_headers(headers)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    setup_panic!();
    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();
    let _log_guard = init_tracing(config);

    warn!(
        "Starting {} v{} ({} environment)",
        config.app.system_name,
        env!("CARGO_PKG_VERSION"),
        config.app.environment
    );

    let startup = lifetime::startup::prepare_server_startup().await;
    let storage = startup.storage.clone();
    let cache = startup.cache.clone();

    debug!(
        "Pre-startup processing completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(app_start_time.start_datetime)
            .num_milliseconds()
    );
    warn!("Using {} worker(s) for the server", config.server.workers);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.cors))
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(routes::configure_auth_routes)
            // /api/v1/admin/catalog 须先于 /api/v1/admin 注册
            .configure(routes::configure_catalog_routes)
            .configure(routes::configure_admin_routes)
            .configure(routes::configure_enrollment_routes)
    })
    .keep_alive(std::time::Duration::from_secs(
        config.server.timeouts.keep_alive,
    ))
    .client_request_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_request,
    ))
    .client_disconnect_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    let server = {
        #[cfg(unix)]
        {
            match config.unix_socket_path() {
                Some(socket_path) => {
                    warn!("Starting server on Unix socket: {}", socket_path);
                    if std::path::Path::new(socket_path).exists() {
                        std::fs::remove_file(socket_path)?;
                    }
                    server.bind_uds(socket_path)?
                }
                None => {
                    let bind_address = config.server_bind_address();
                    warn!("Starting server at http://{}", bind_address);
                    server.bind(bind_address)?
                }
            }
        }

        #[cfg(not(unix))]
        {
            let bind_address = config.server_bind_address();
            warn!("Starting server at http://{}", bind_address);
            server.bind(bind_address)?
        }
    }
    .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
