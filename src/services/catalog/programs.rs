use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::models::{
    ApiResponse, ErrorCode,
    catalog::requests::{CreateProfessorRequest, CreateProgramRequest, UpdateProgramRequest},
};
use crate::services::error_response;

pub async fn list_programs(
    service: &CatalogService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_programs().await {
        Ok(programs) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            programs,
            "Programs retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve programs")),
    }
}

pub async fn create_program(
    service: &CatalogService,
    mut program: CreateProgramRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    program.code = program.code.trim().to_uppercase();
    if program.code.is_empty() || program.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Program code and name are required",
        )));
    }

    // 专业代码唯一
    match storage.get_program_by_code(&program.code).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ProgramAlreadyExists,
                format!("Program {} already exists", program.code),
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(e, "Failed to create program")),
    }

    match storage.create_program(program).await {
        Ok(program) => {
            tracing::info!("Program {} created", program.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                program,
                "Program created successfully",
            )))
        }
        Err(e) => Ok(error_response(e, "Failed to create program")),
    }
}

pub async fn update_program(
    service: &CatalogService,
    program_id: i64,
    update: UpdateProgramRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.update_program(program_id, update).await {
        Ok(Some(program)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            program,
            "Program updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ProgramNotFound,
            "Program not found",
        ))),
        Err(e) => Ok(error_response(e, "Failed to update program")),
    }
}

pub async fn list_professors(
    service: &CatalogService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_professors().await {
        Ok(professors) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            professors,
            "Professors retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve professors")),
    }
}

pub async fn create_professor(
    service: &CatalogService,
    professor: CreateProfessorRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if professor.first_name.trim().is_empty() || professor.last_name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Professor name is required",
        )));
    }

    match storage.create_professor(professor).await {
        Ok(professor) => Ok(HttpResponse::Created().json(ApiResponse::success(
            professor,
            "Professor created successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to create professor")),
    }
}
