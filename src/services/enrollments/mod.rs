pub mod history;
pub mod overview;
pub mod schedule;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::engine::EnrollmentContext;
use crate::models::enrollments::requests::{
    OverviewQuery, StudentScheduleQuery, SubmitEnrollmentRequest,
};
use crate::services::{error_response, require_principal};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => crate::services::storage_from_request(request),
        }
    }

    /// 解析当前学生的选课上下文
    pub(crate) async fn get_context(
        &self,
        request: &HttpRequest,
    ) -> Result<(Arc<dyn Storage>, EnrollmentContext), HttpResponse> {
        let principal = require_principal(request)?;
        let storage = self.get_storage(request);
        let ctx = EnrollmentContext::resolve(storage.as_ref(), &principal)
            .await
            .map_err(|e| error_response(e, "Failed to load enrollment context"))?;
        Ok((storage, ctx))
    }

    // 选课概览
    pub async fn overview(
        &self,
        query: OverviewQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        overview::handle_overview(self, query, request).await
    }

    // 提交选课
    pub async fn submit(
        &self,
        submission: SubmitEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::handle_submit(self, submission, request).await
    }

    // 我的选课记录
    pub async fn my_enrollments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        schedule::list_my_enrollments(self, request).await
    }

    // 我的课表
    pub async fn my_schedule(
        &self,
        query: StudentScheduleQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        schedule::list_my_schedule(self, query, request).await
    }

    // 我的学业记录
    pub async fn my_history(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        history::list_my_history(self, request).await
    }
}
