use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::CatalogService;
use crate::cache::{CacheResult, ObjectCacheExt, keys};
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    catalog::{
        entities::Course,
        requests::{CreateCourseRequest, TermQuery},
        responses::{CourseBrief, CourseListItem},
    },
};
use crate::services::error_response;

/// 按学期读取课程列表，优先走缓存
async fn cached_courses(
    service: &CatalogService,
    query: TermQuery,
    request: &HttpRequest,
) -> Result<Vec<Course>> {
    let cache = service.get_cache(request);
    let key = keys::course_list(query.year_level, query.semester);

    if let Some(cache) = &cache
        && let CacheResult::Found(courses) = cache.get_json::<Vec<Course>>(&key).await
    {
        debug!("Course list served from cache: {}", key);
        return Ok(courses);
    }

    let courses = service.get_storage(request).list_courses(query).await?;
    if let Some(cache) = &cache {
        cache.insert_json(key, &courses, 0).await;
    }
    Ok(courses)
}

pub async fn list_courses(
    service: &CatalogService,
    query: TermQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match cached_courses(service, query, request).await {
        Ok(courses) => {
            let items: Vec<CourseListItem> = courses.into_iter().map(CourseListItem::from).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                items,
                "Courses retrieved successfully",
            )))
        }
        Err(e) => Ok(error_response(e, "Failed to retrieve courses")),
    }
}

pub async fn list_course_briefs(
    service: &CatalogService,
    query: TermQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match cached_courses(service, query, request).await {
        Ok(courses) => {
            let briefs: Vec<CourseBrief> = courses.iter().map(CourseBrief::from).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                briefs,
                "Courses retrieved successfully",
            )))
        }
        Err(e) => Ok(error_response(e, "Failed to retrieve courses")),
    }
}

pub async fn get_course(
    service: &CatalogService,
    code: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_course(code).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseListItem::from(course),
            "Course retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            format!("Course {code} not found"),
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve course")),
    }
}

pub async fn create_course(
    service: &CatalogService,
    mut course: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    course.code = course.code.trim().to_string();
    if course.code.is_empty() || course.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Course code and name are required",
        )));
    }
    if course.units <= 0 || course.lec_hours < 0 || course.lab_hours < 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Units must be positive and hours cannot be negative",
        )));
    }
    if course.prerequisites.iter().any(|code| *code == course.code) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "A course cannot be its own prerequisite",
        )));
    }

    match storage.get_course(&course.code).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseAlreadyExists,
                format!("Course {} already exists", course.code),
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(e, "Failed to create course")),
    }

    match storage.create_course(course).await {
        Ok(course) => {
            // 失效该学期相关的全部列表缓存
            if let Some(cache) = service.get_cache(request) {
                for key in keys::course_list_variants(course.year_level, course.semester) {
                    cache.remove(&key).await;
                }
            }
            tracing::info!("Course {} created", course.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CourseListItem::from(course),
                "Course created successfully",
            )))
        }
        Err(e) => Ok(error_response(e, "Failed to create course")),
    }
}
