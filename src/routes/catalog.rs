use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::catalog::requests::{
    CourseScheduleQuery, CreateAcademicYearRequest, CreateCourseRequest, CreateProfessorRequest,
    CreateProgramRequest, CreateScheduleRequest, CreateSectionRequest, SectionCapacityQuery,
    TermQuery, UpdateProgramRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CatalogService;
use crate::utils::{SafeCourseCode, SafeIDI64};

// 懒加载的全局 CatalogService 实例
static CATALOG_SERVICE: Lazy<CatalogService> = Lazy::new(CatalogService::new_lazy);

pub async fn list_programs(req: HttpRequest) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_programs(&req).await
}

pub async fn create_program(
    req: HttpRequest,
    program: web::Json<CreateProgramRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE
        .create_program(program.into_inner(), &req)
        .await
}

pub async fn update_program(
    req: HttpRequest,
    path: SafeIDI64,
    update: web::Json<UpdateProgramRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE
        .update_program(path.0, update.into_inner(), &req)
        .await
}

pub async fn list_professors(req: HttpRequest) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_professors(&req).await
}

pub async fn create_professor(
    req: HttpRequest,
    professor: web::Json<CreateProfessorRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE
        .create_professor(professor.into_inner(), &req)
        .await
}

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<TermQuery>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn list_course_briefs(
    req: HttpRequest,
    query: web::Query<TermQuery>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE
        .list_course_briefs(query.into_inner(), &req)
        .await
}

pub async fn get_course(req: HttpRequest, path: SafeCourseCode) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.get_course(&path.0, &req).await
}

pub async fn create_course(
    req: HttpRequest,
    course: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.create_course(course.into_inner(), &req).await
}

pub async fn list_sections(
    req: HttpRequest,
    query: web::Query<TermQuery>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_sections(query.into_inner(), &req).await
}

pub async fn create_section(
    req: HttpRequest,
    section: web::Json<CreateSectionRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE
        .create_section(section.into_inner(), &req)
        .await
}

pub async fn section_capacities(
    req: HttpRequest,
    query: web::Query<SectionCapacityQuery>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE
        .section_capacities(query.into_inner(), &req)
        .await
}

pub async fn list_academic_years(req: HttpRequest) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_academic_years(&req).await
}

pub async fn current_academic_year(req: HttpRequest) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.current_academic_year(&req).await
}

pub async fn create_academic_year(
    req: HttpRequest,
    academic_year: web::Json<CreateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE
        .create_academic_year(academic_year.into_inner(), &req)
        .await
}

pub async fn lookup_schedules(
    req: HttpRequest,
    query: web::Query<CourseScheduleQuery>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE
        .lookup_schedules(query.into_inner(), &req)
        .await
}

pub async fn list_schedules(
    req: HttpRequest,
    query: web::Query<TermQuery>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_schedules(query.into_inner(), &req).await
}

pub async fn create_schedule(
    req: HttpRequest,
    schedule: web::Json<CreateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE
        .create_schedule(schedule.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_catalog_routes(cfg: &mut web::ServiceConfig) {
    // 公开只读接口（注册页需要专业列表）
    cfg.service(
        web::scope("/api/v1/catalog")
            .route("/programs", web::get().to(list_programs))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/professors", web::get().to(list_professors))
                    .route("/courses", web::get().to(list_courses))
                    .route("/courses/brief", web::get().to(list_course_briefs))
                    .route("/courses/{code}", web::get().to(get_course))
                    .route("/sections", web::get().to(list_sections))
                    .route("/academic-years", web::get().to(list_academic_years))
                    .route(
                        "/academic-years/current",
                        web::get().to(current_academic_year),
                    )
                    .route("/schedules", web::get().to(lookup_schedules)),
            ),
    );

    // 管理端维护接口
    cfg.service(
        web::scope("/api/v1/admin/catalog")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/programs", web::post().to(create_program))
                    .route("/programs/{id}", web::put().to(update_program))
                    .route("/professors", web::post().to(create_professor))
                    .route("/courses", web::post().to(create_course))
                    .route("/sections", web::post().to(create_section))
                    .route("/sections/capacity", web::get().to(section_capacities))
                    .route("/academic-years", web::post().to(create_academic_year))
                    .route("/schedules", web::get().to(list_schedules))
                    .route("/schedules", web::post().to(create_schedule)),
            ),
    );
}
