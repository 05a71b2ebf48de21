use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::{ApiResponse, ErrorCode, users::requests::CreateAdminRequest};
use crate::services::error_response;
use crate::utils::validate::{validate_email, validate_name};

pub async fn create_admin(
    service: &AdminService,
    admin: CreateAdminRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_name(&admin.first_name, "First name")
        .and_then(|_| validate_name(&admin.last_name, "Last name"))
        .and_then(|_| validate_email(admin.email.trim()).map_err(str::to_string))
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    match storage.create_admin(admin).await {
        Ok(admin) => {
            tracing::info!("Admin {} created", admin.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                admin,
                "Admin created successfully",
            )))
        }
        Err(e) => Ok(error_response(e, "Failed to create admin")),
    }
}
