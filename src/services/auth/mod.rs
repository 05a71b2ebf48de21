pub mod login;
pub mod logout;
pub mod register;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::models::{auth::requests::LoginRequest, users::requests::RegisterStudentRequest};
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => crate::services::storage_from_request(request),
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .map(|data| data.get_ref().clone())
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录：ID + 出生日期
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 学生注册
    pub async fn register(
        &self,
        register_request: RegisterStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, register_request, request).await
    }

    // 刷新令牌
    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, request).await
    }

    // 登出
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, request).await
    }

    // 当前用户信息
    pub async fn me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_me(self, request).await
    }
}
