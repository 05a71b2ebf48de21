use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::enrollments::requests::{
    OverviewQuery, StudentScheduleQuery, SubmitEnrollmentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::EnrollmentService;

// 懒加载的全局 EnrollmentService 实例
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn overview(
    req: HttpRequest,
    query: web::Query<OverviewQuery>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.overview(query.into_inner(), &req).await
}

pub async fn submit(
    req: HttpRequest,
    submission: web::Json<SubmitEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .submit(submission.into_inner(), &req)
        .await
}

pub async fn my_enrollments(req: HttpRequest) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.my_enrollments(&req).await
}

pub async fn my_schedule(
    req: HttpRequest,
    query: web::Query<StudentScheduleQuery>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.my_schedule(query.into_inner(), &req).await
}

pub async fn my_history(req: HttpRequest) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.my_history(&req).await
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles()))
                    .route("/overview", web::get().to(overview))
                    .service(
                        web::resource("")
                            .wrap(RateLimit::enrollment_submit())
                            .route(web::post().to(submit)),
                    )
                    .route("/records", web::get().to(my_enrollments))
                    .route("/schedule", web::get().to(my_schedule))
                    .route("/history", web::get().to(my_history)),
            ),
    );
}
