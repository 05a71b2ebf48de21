use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::requests::{StudentListParams, StudentListQuery},
};
use crate::services::enrollments::history::group_history;
use crate::services::error_response;

fn student_not_found(student_id: i64) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::StudentNotFound,
        format!("Student {student_id} not found"),
    ))
}

pub async fn list_students(
    service: &AdminService,
    query: StudentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_students_with_pagination(StudentListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Student list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve student list")),
    }
}

pub async fn get_student(
    service: &AdminService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student retrieved successfully",
        ))),
        Ok(None) => Ok(student_not_found(student_id)),
        Err(e) => Ok(error_response(e, "Failed to retrieve student")),
    }
}

pub async fn student_enrollments(
    service: &AdminService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_student_by_id(student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(student_not_found(student_id)),
        Err(e) => return Ok(error_response(e, "Failed to retrieve enrollments")),
    }

    match storage.list_student_enrollments(student_id).await {
        Ok(enrollments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollments,
            "Enrollments retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve enrollments")),
    }
}

pub async fn student_history(
    service: &AdminService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_student_by_id(student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(student_not_found(student_id)),
        Err(e) => return Ok(error_response(e, "Failed to retrieve academic history")),
    }

    match storage.list_history_entries(student_id).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            group_history(entries),
            "Academic history retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve academic history")),
    }
}
