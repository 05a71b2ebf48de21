/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>` 中的访问令牌，解析出调用方身份（Principal）
 * 并放入请求扩展，后续处理程序通过 `RequireJWT::extract_principal` 取用。
 *
 * ```rust,ignore
 * web::scope("/api/v1/enrollments")
 *     .wrap(RequireJWT)
 *     .route("/overview", web::get().to(overview_handler))
 * ```
 *
 * 解析顺序：
 * 1. 校验令牌签名、有效期与类型（只接受 access 令牌）
 * 2. 按用户 ID 查询缓存中的 Principal
 * 3. 缓存未命中时依次查询学生、管理员档案，并写回缓存
 */

use crate::cache::{CacheResult, ObjectCache, ObjectCacheExt, keys};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::Principal;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, StatusCode, header::AUTHORIZATION},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

/// 认证失败原因，`Display` 即返回给客户端的说明
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthFailure {
    MissingToken,
    InvalidToken,
    MalformedSubject,
    StorageUnavailable,
    UnknownUser,
    RoleMismatch,
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AuthFailure::MissingToken => "Missing or invalid Authorization header",
            AuthFailure::InvalidToken => "Invalid JWT token",
            AuthFailure::MalformedSubject => "Invalid user ID in JWT",
            AuthFailure::StorageUnavailable => "Failed to retrieve user from storage",
            AuthFailure::UnknownUser => "User not found",
            AuthFailure::RoleMismatch => "Token role does not match account",
        })
    }
}

#[derive(Clone)]
pub struct RequireJWT;

/// `Bearer <token>`，前缀大小写不敏感
fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// 先查学生档案，再查管理员档案
async fn load_principal(
    storage: &dyn Storage,
    user_id: i64,
) -> crate::errors::Result<Option<Principal>> {
    if let Some(student) = storage.get_student_by_user_id(user_id).await? {
        return Ok(Some(Principal::from_student(&student)));
    }
    let admin = storage.get_admin_by_user_id(user_id).await?;
    Ok(admin.as_ref().map(Principal::from_admin))
}

async fn authenticate(req: &ServiceRequest) -> Result<Principal, AuthFailure> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_bearer)
        .ok_or(AuthFailure::MissingToken)?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::InvalidToken
    })?;
    let user_id = claims.user_id().ok_or(AuthFailure::MalformedSubject)?;
    let cache_key = keys::principal(user_id);

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());

    if let Some(cache) = &cache {
        match cache.get_json::<Principal>(&cache_key).await {
            CacheResult::Found(principal) if principal.role == claims.role => return Ok(principal),
            CacheResult::NotFound => debug!("Principal for user {} not cached", user_id),
            // 角色已变化或缓存损坏
            _ => cache.remove(&cache_key).await,
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or(AuthFailure::StorageUnavailable)?;

    let principal = load_principal(storage.as_ref(), user_id)
        .await
        .map_err(|err| {
            info!("Failed to load principal for user {}: {}", user_id, err);
            AuthFailure::StorageUnavailable
        })?
        .ok_or(AuthFailure::UnknownUser)?;

    if principal.role != claims.role {
        return Err(AuthFailure::RoleMismatch);
    }

    if let Some(cache) = &cache {
        let ttl = AppConfig::get().cache.default_ttl;
        cache.insert_json(cache_key, &principal, ttl).await;
    }

    Ok(principal)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // CORS 预检直接放行
            if req.method() == Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(principal) => {
                    debug!(
                        "JWT authentication successful for user {} ({})",
                        principal.user_id, principal.role
                    );
                    req.extensions_mut().insert(principal);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取调用方身份
    pub fn extract_principal(req: &HttpRequest) -> Option<Principal> {
        req.extensions().get::<Principal>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<Principal>().map(|p| p.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc.def"), Some("abc.def"));
        assert_eq!(parse_bearer("bearer  abc "), Some("abc"));
        assert_eq!(parse_bearer("Basic dXNlcg=="), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("abc"), None);
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(AuthFailure::UnknownUser.to_string(), "User not found");
        assert_eq!(
            format!("Unauthorized: {}", AuthFailure::InvalidToken),
            "Unauthorized: Invalid JWT token"
        );
    }
}
