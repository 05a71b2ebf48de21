use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::models::{
    ApiResponse, ErrorCode,
    catalog::requests::{CreateSectionRequest, SectionCapacityQuery, TermQuery},
};
use crate::services::error_response;

pub async fn list_sections(
    service: &CatalogService,
    query: TermQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_sections(query.year_level).await {
        Ok(sections) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            sections,
            "Sections retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve sections")),
    }
}

pub async fn create_section(
    service: &CatalogService,
    section: CreateSectionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if section.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Section name is required",
        )));
    }
    if section.capacity < 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Section capacity cannot be negative",
        )));
    }

    match storage.create_section(section).await {
        Ok(section) => {
            tracing::info!(
                "Section {} created ({}, capacity {})",
                section.name,
                section.year_level,
                section.capacity
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                section,
                "Section created successfully",
            )))
        }
        Err(e) => Ok(error_response(e, "Failed to create section")),
    }
}

pub async fn section_capacities(
    service: &CatalogService,
    query: SectionCapacityQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.section_capacities(query).await {
        Ok(capacities) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            capacities,
            "Section capacities retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve section capacities")),
    }
}
