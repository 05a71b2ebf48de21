/*!
 * 速率限制中间件
 *
 * 固定窗口计数：每个 (前缀, 调用方, 窗口序号) 一个计数器，存放在进程内的 moka 缓存中。
 * 已认证请求按用户计数，匿名请求按客户端 IP 计数。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 *
 * 超限返回 429 并带 `Retry-After`；放行的响应附带 `X-RateLimit-Limit` / `X-RateLimit-Remaining`。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::Principal};

/// 允许的最长窗口，同时是计数器的存活时间
const MAX_WINDOW_SECS: u64 = 3600;

const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

static COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: &'static str,
}

impl RateLimit {
    /// `window_secs` 取值 1..=3600
    pub fn new(key_prefix: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            key_prefix,
        }
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    /// 注册：3 次/分钟
    pub fn register() -> Self {
        Self::new("register", 3, 60)
    }

    /// 刷新令牌：10 次/分钟
    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    /// 提交选课：10 次/分钟
    pub fn enrollment_submit() -> Self {
        Self::new("enroll", 10, 60)
    }
}

/// 当前所在窗口序号及窗口剩余秒数
fn current_window(now_secs: u64, window_secs: u64) -> (u64, u64) {
    let index = now_secs / window_secs;
    let resets_in = window_secs - now_secs % window_secs;
    (index, resets_in)
}

fn window_key(prefix: &str, caller: &str, window: u64) -> String {
    format!("{prefix}:{caller}:{window}")
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

/// 调用方标识：已认证用户优先，否则取连接地址或转发头中的第一个合法 IP
fn caller_identity(req: &ServiceRequest) -> String {
    if let Some(principal) = req.extensions().get::<Principal>() {
        return format!("user:{}", principal.user_id);
    }

    let peer = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string);
    let ip = peer
        .clone()
        .filter(|ip| is_valid_ip(ip))
        .or_else(|| {
            ["X-Forwarded-For", "X-Real-IP"]
                .iter()
                .filter_map(|name| req.headers().get(*name)?.to_str().ok())
                .filter_map(|value| value.split(',').next())
                .map(str::trim)
                .find(|ip| is_valid_ip(ip))
                .map(str::to_string)
        })
        .or(peer)
        .unwrap_or_else(|| "unknown".to_string());

    format!("ip:{ip}")
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::TooManyRequests()
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header((REMAINING_HEADER, HeaderValue::from(0u32)))
        .json(ApiResponse::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let now_secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            let (window, resets_in) = current_window(now_secs, limit.window_secs);
            let key = window_key(limit.key_prefix, &caller_identity(&req), window);

            // 原子自增
            let count = COUNTERS
                .entry(key.clone())
                .and_upsert_with(|existing| {
                    let previous = existing.map(|e| e.into_value()).unwrap_or(0);
                    ready(previous.saturating_add(1))
                })
                .await
                .into_value();

            if count > limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{})",
                    key, count, limit.max_requests
                );
                return Ok(req.into_response(too_many_requests(resets_in).map_into_right_body()));
            }

            let mut res = srv.call(req).await?;
            let headers = res.headers_mut();
            headers.insert(LIMIT_HEADER, HeaderValue::from(limit.max_requests));
            headers.insert(
                REMAINING_HEADER,
                HeaderValue::from(limit.max_requests - count),
            );
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!((login.key_prefix, login.max_requests), ("login", 5));
        assert_eq!(RateLimit::register().max_requests, 3);
        assert_eq!(RateLimit::enrollment_submit().key_prefix, "enroll");
    }

    #[test]
    fn test_window_is_clamped() {
        assert_eq!(RateLimit::new("x", 1, 0).window_secs, 1);
        assert_eq!(RateLimit::new("x", 1, 86_400).window_secs, MAX_WINDOW_SECS);
    }

    #[test]
    fn test_current_window() {
        assert_eq!(current_window(120, 60), (2, 60));
        assert_eq!(current_window(179, 60), (2, 1));
        assert_eq!(current_window(180, 60), (3, 60));
    }

    #[test]
    fn test_window_key() {
        assert_eq!(window_key("login", "ip:1.2.3.4", 7), "login:ip:1.2.3.4:7");
    }

    #[test]
    fn test_is_valid_ip() {
        assert!(is_valid_ip("127.0.0.1"));
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("not-an-ip"));
    }

    #[actix_web::test]
    async fn test_requests_over_limit_are_rejected() {
        use actix_web::{App, HttpResponse, http::StatusCode, test, web};

        let app = test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::new("test-limited", 2, 3600))
                    .route(web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let call = || {
            test::TestRequest::get()
                .uri("/limited")
                .peer_addr("10.1.2.3:4000".parse().unwrap())
                .to_request()
        };

        let first = test::call_service(&app, call()).await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers().get("x-ratelimit-remaining").unwrap(), "1");
        assert_eq!(test::call_service(&app, call()).await.status(), StatusCode::OK);
        assert_eq!(
            test::call_service(&app, call()).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
