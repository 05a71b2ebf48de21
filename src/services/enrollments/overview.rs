use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::engine::build_overview;
use crate::models::{ApiResponse, enrollments::requests::OverviewQuery};
use crate::services::error_response;

pub async fn handle_overview(
    service: &EnrollmentService,
    query: OverviewQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, ctx) = match service.get_context(request).await {
        Ok(resolved) => resolved,
        Err(response) => return Ok(response),
    };

    match build_overview(storage.as_ref(), &ctx, &query).await {
        Ok(overview) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            overview,
            "Enrollment overview retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to build enrollment overview")),
    }
}
