use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use super::grouping::{group_by_course_section, group_by_section};
use crate::models::{
    ApiResponse, ErrorCode,
    catalog::requests::{CourseScheduleQuery, CreateScheduleRequest, TermQuery},
};
use crate::services::error_response;

/// 按课程查询时段，按班级分组
pub async fn lookup_schedules(
    service: &CatalogService,
    query: CourseScheduleQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let course_code = query.course_code.trim();

    match storage.list_schedules_by_course(course_code).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            group_by_section(&rows),
            "Schedules retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve schedules")),
    }
}

/// 管理端课表列表，按 (课程, 班级) 分组
pub async fn list_schedules(
    service: &CatalogService,
    query: TermQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_schedules(query).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            group_by_course_section(&rows),
            "Schedules retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve schedules")),
    }
}

pub async fn create_schedule(
    service: &CatalogService,
    schedule: CreateScheduleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if schedule.start_time >= schedule.end_time {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ScheduleTimeInvalid,
            "Start time must be earlier than end time",
        )));
    }

    match storage.get_section(schedule.section_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SectionNotFound,
                format!("Section {} not found", schedule.section_id),
            )));
        }
        Err(e) => return Ok(error_response(e, "Failed to create schedule")),
    }
    match storage.get_course(&schedule.course_code).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                format!("Course {} not found", schedule.course_code),
            )));
        }
        Err(e) => return Ok(error_response(e, "Failed to create schedule")),
    }

    match storage.create_schedule(schedule).await {
        Ok(schedule) => {
            tracing::info!(
                "Schedule {} created for {} ({})",
                schedule.mis_code,
                schedule.course_code,
                schedule.day_time()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                schedule,
                "Schedule created successfully",
            )))
        }
        Err(e) => Ok(HttpResponse::build(e.status_code()).json(ApiResponse::error_empty(
            ErrorCode::ScheduleCreationFailed,
            if e.is_client_error() {
                e.message().to_string()
            } else {
                tracing::error!("Failed to create schedule: {}", e);
                "Failed to create schedule".to_string()
            },
        ))),
    }
}
