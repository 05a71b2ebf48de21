use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::models::{ApiResponse, ErrorCode, catalog::requests::CreateAcademicYearRequest};
use crate::services::error_response;
use crate::utils::validate::validate_academic_year_label;

pub async fn list_academic_years(
    service: &CatalogService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_academic_years().await {
        Ok(years) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            years,
            "Academic years retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve academic years")),
    }
}

pub async fn current_academic_year(
    service: &CatalogService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.current_academic_year().await {
        Ok(Some(year)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            year,
            "Current academic year retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AcademicYearNotFound,
            "No academic year has been configured",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve academic year")),
    }
}

pub async fn create_academic_year(
    service: &CatalogService,
    academic_year: CreateAcademicYearRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let label = academic_year.label.trim();

    if let Err(msg) = validate_academic_year_label(label) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AcademicYearLabelInvalid,
            msg,
        )));
    }

    match storage.list_academic_years().await {
        Ok(years) if years.iter().any(|y| y.label == label) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AcademicYearAlreadyExists,
                format!("Academic year {label} already exists"),
            )));
        }
        Ok(_) => {}
        Err(e) => return Ok(error_response(e, "Failed to create academic year")),
    }

    match storage.create_academic_year(label).await {
        Ok(year) => {
            tracing::info!("Academic year {} created", year.label);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                year,
                "Academic year created successfully",
            )))
        }
        Err(e) => Ok(error_response(e, "Failed to create academic year")),
    }
}
