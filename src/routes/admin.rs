use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{EnrollmentListParams, RecordRemarksRequest};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{CreateAdminRequest, StudentListParams};
use crate::services::AdminService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

// 懒加载的全局 AdminService 实例
static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_students(query.into_inner(), &req).await
}

pub async fn get_student(req: HttpRequest, path: SafeStudentIdI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.get_student(path.0, &req).await
}

pub async fn student_enrollments(
    req: HttpRequest,
    path: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.student_enrollments(path.0, &req).await
}

pub async fn student_history(
    req: HttpRequest,
    path: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.student_history(path.0, &req).await
}

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .list_enrollments(query.into_inner(), &req)
        .await
}

pub async fn get_enrollment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.get_enrollment(path.0, &req).await
}

pub async fn approve_enrollment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.approve_enrollment(path.0, &req).await
}

pub async fn reject_enrollment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.reject_enrollment(path.0, &req).await
}

pub async fn record_remarks(
    req: HttpRequest,
    path: SafeIDI64,
    remarks: web::Json<RecordRemarksRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .record_remarks(path.0, remarks.into_inner(), &req)
        .await
}

pub async fn create_admin(
    req: HttpRequest,
    admin: web::Json<CreateAdminRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.create_admin(admin.into_inner(), &req).await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/students", web::get().to(list_students))
                    .route("/students/{student_id}", web::get().to(get_student))
                    .route(
                        "/students/{student_id}/enrollments",
                        web::get().to(student_enrollments),
                    )
                    .route(
                        "/students/{student_id}/history",
                        web::get().to(student_history),
                    )
                    .route("/enrollments", web::get().to(list_enrollments))
                    .route("/enrollments/{id}", web::get().to(get_enrollment))
                    .route(
                        "/enrollments/{id}/approve",
                        web::post().to(approve_enrollment),
                    )
                    .route("/enrollments/{id}/reject", web::post().to(reject_enrollment))
                    .route("/enrollments/{id}/remarks", web::put().to(record_remarks))
                    .route("/admins", web::post().to(create_admin)),
            ),
    );
}
