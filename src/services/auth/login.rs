use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::services::error_response;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    // 1. 先按学生、再按管理员匹配 ID + 出生日期
    let identity = match storage
        .find_identity(login_request.id, login_request.date_of_birth)
        .await
    {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Invalid ID or date of birth",
            )));
        }
        Err(e) => return Ok(error_response(e, "Login failed")),
    };
    let principal = identity.principal();

    // 2. 生成令牌对
    match JwtUtils::generate_token_pair(principal.user_id, principal.role) {
        Ok(token_pair) => {
            tracing::info!(
                "{} {} logged in successfully",
                principal.role,
                principal.account_id
            );

            let refresh_cookie = JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token);
            let response = LoginResponse {
                access_token: token_pair.access_token,
                expires_in: config.jwt.access_token_expiry * 60,
                principal,
                created_at: chrono::Utc::now(),
            };

            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            )
        }
    }
}
