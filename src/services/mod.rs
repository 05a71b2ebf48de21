pub mod admin;
pub mod auth;
pub mod catalog;
pub mod enrollments;

pub use admin::AdminService;
pub use auth::AuthService;
pub use catalog::CatalogService;
pub use enrollments::EnrollmentService;

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::errors::EnrollSysError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::Principal};
use crate::storage::Storage;

/// 从应用数据中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

/// 将业务错误转换为统一响应
///
/// 客户端错误原样返回消息；其余错误记录日志，只返回 `context`。
pub(crate) fn error_response(err: EnrollSysError, context: &str) -> HttpResponse {
    let status = err.status_code();
    if err.is_client_error() {
        return HttpResponse::build(status).json(ApiResponse::error_empty(
            ErrorCode::from(&err),
            err.message(),
        ));
    }

    tracing::error!("{}: {}", context, err);
    HttpResponse::build(status).json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        context,
    ))
}

/// 已认证调用方，缺失时返回 401 响应
pub(crate) fn require_principal(request: &HttpRequest) -> Result<Principal, HttpResponse> {
    RequireJWT::extract_principal(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_client_errors_keep_message() {
        let resp = error_response(
            EnrollSysError::capacity_exhausted("No available sections"),
            "Failed to submit enrollment",
        );
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = error_response(EnrollSysError::validation("bad"), "ctx");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let resp = error_response(
            EnrollSysError::database_operation("connection reset"),
            "Failed to submit enrollment",
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
