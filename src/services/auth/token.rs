use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::responses::{MeResponse, RefreshTokenResponse};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, require_principal};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    match JwtUtils::refresh_access_token(&refresh_token) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            Ok(HttpResponse::Unauthorized()
                .cookie(JwtUtils::create_empty_refresh_token_cookie())
                .json(ApiResponse::error_empty(
                    ErrorCode::Unauthorized,
                    "Login expired or invalid, please login again",
                )))
        }
    }
}

pub async fn handle_me(service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(principal) => principal,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    let (student, admin) = match principal.role {
        UserRole::Student => match storage.get_student_by_id(principal.account_id).await {
            Ok(student) => (student, None),
            Err(e) => return Ok(error_response(e, "Failed to load profile")),
        },
        UserRole::Admin => match storage.get_admin_by_id(principal.account_id).await {
            Ok(admin) => (None, admin),
            Err(e) => return Ok(error_response(e, "Failed to load profile")),
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MeResponse {
            principal,
            student,
            admin,
        },
        "User information retrieved successfully",
    )))
}
