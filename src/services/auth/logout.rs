use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::keys;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

/// 清除 refresh_token cookie，并丢弃缓存的身份
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let (Some(cache), Some(user_id)) = (
        service.get_cache(request),
        RequireJWT::extract_user_id(request),
    ) {
        cache.remove(&keys::principal(user_id)).await;
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::<()>::success_empty("Logged out")))
}
