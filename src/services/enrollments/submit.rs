use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::engine::submit_enrollment;
use crate::models::{ApiResponse, enrollments::requests::SubmitEnrollmentRequest};
use crate::services::error_response;

pub async fn handle_submit(
    service: &EnrollmentService,
    submission: SubmitEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, ctx) = match service.get_context(request).await {
        Ok(resolved) => resolved,
        Err(response) => return Ok(response),
    };

    match submit_enrollment(storage.as_ref(), &ctx, submission).await {
        Ok(submitted) => Ok(HttpResponse::Created().json(ApiResponse::success(
            submitted,
            "Enrollment submitted, waiting for approval",
        ))),
        Err(e) => Ok(error_response(e, "Failed to submit enrollment")),
    }
}
