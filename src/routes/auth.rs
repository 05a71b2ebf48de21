use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::auth::requests::LoginRequest;
use crate::models::users::requests::RegisterStudentRequest;
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    login_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(login_data.into_inner(), &req).await
}

pub async fn register(
    req: HttpRequest,
    register_data: web::Json<RegisterStudentRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.register(register_data.into_inner(), &req).await
}

pub async fn refresh_token(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&req).await
}

pub async fn logout(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&req).await
}

pub async fn me(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.me(&req).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(
                web::resource("/login")
                    .wrap(RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/register")
                    .wrap(RateLimit::register())
                    .route(web::post().to(register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(RateLimit::refresh_token())
                    .route(web::post().to(refresh_token)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/logout", web::post().to(logout))
                    .route("/me", web::get().to(me)),
            ),
    );
}
