use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::engine::{approve_enrollment, record_remarks as write_remarks, reject_enrollment};
use crate::errors::{EnrollSysError, Result};
use crate::models::{
    ApiResponse,
    enrollments::{
        requests::{EnrollmentListParams, EnrollmentListQuery, RecordRemarksRequest},
        responses::EnrollmentDetailResponse,
    },
};
use crate::services::error_response;
use crate::storage::Storage;

pub async fn list_enrollments(
    service: &AdminService,
    query: EnrollmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_enrollments_with_pagination(EnrollmentListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Enrollment list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve enrollments")),
    }
}

async fn load_detail(storage: &dyn Storage, enrollment_id: i64) -> Result<EnrollmentDetailResponse> {
    let not_found = || EnrollSysError::not_found(format!("Enrollment #{enrollment_id} not found"));

    let enrollment = storage
        .get_enrollment(enrollment_id)
        .await?
        .ok_or_else(not_found)?;
    let student = storage
        .get_student_by_id(enrollment.student_id)
        .await?
        .ok_or_else(|| EnrollSysError::not_found(format!("Student {} not found", enrollment.student_id)))?;
    let academic_year = storage
        .get_academic_year(enrollment.academic_year_id)
        .await?
        .ok_or_else(|| EnrollSysError::not_found("Academic year not found"))?;
    let details = storage.list_enroll_detail_views(enrollment_id).await?;
    let remarks = storage.list_enrollment_records(enrollment_id).await?;

    Ok(EnrollmentDetailResponse {
        enrollment,
        student,
        academic_year,
        details,
        remarks,
    })
}

pub async fn get_enrollment(
    service: &AdminService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match load_detail(storage.as_ref(), enrollment_id).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Enrollment retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve enrollment")),
    }
}

pub async fn approve(
    service: &AdminService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match approve_enrollment(storage.as_ref(), enrollment_id).await {
        Ok(enrollment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            format!("Enrollment #{enrollment_id} has been approved"),
        ))),
        Err(e) => Ok(error_response(e, "Failed to approve enrollment")),
    }
}

pub async fn reject(
    service: &AdminService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match reject_enrollment(storage.as_ref(), enrollment_id).await {
        Ok(enrollment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            format!("Enrollment #{enrollment_id} has been rejected"),
        ))),
        Err(e) => Ok(error_response(e, "Failed to reject enrollment")),
    }
}

pub async fn record_remarks(
    service: &AdminService,
    enrollment_id: i64,
    remarks: RecordRemarksRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match write_remarks(storage.as_ref(), enrollment_id, remarks.remarks).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            records,
            "Academic remarks saved",
        ))),
        Err(e) => Ok(error_response(e, "Failed to save academic remarks")),
    }
}
