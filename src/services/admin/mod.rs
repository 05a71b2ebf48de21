pub mod admins;
pub mod enrollments;
pub mod students;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::enrollments::requests::{EnrollmentListParams, RecordRemarksRequest};
use crate::models::users::requests::{CreateAdminRequest, StudentListParams};
use crate::storage::Storage;

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => crate::services::storage_from_request(request),
        }
    }

    // 学生档案
    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::list_students(self, query, request).await
    }

    pub async fn get_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::get_student(self, student_id, request).await
    }

    pub async fn student_enrollments(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::student_enrollments(self, student_id, request).await
    }

    pub async fn student_history(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::student_history(self, student_id, request).await
    }

    // 选课审核
    pub async fn list_enrollments(
        &self,
        query: EnrollmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::list_enrollments(self, query, request).await
    }

    pub async fn get_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::get_enrollment(self, enrollment_id, request).await
    }

    pub async fn approve_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::approve(self, enrollment_id, request).await
    }

    pub async fn reject_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::reject(self, enrollment_id, request).await
    }

    pub async fn record_remarks(
        &self,
        enrollment_id: i64,
        remarks: RecordRemarksRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::record_remarks(self, enrollment_id, remarks, request).await
    }

    // 管理员账号
    pub async fn create_admin(
        &self,
        admin: CreateAdminRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        admins::create_admin(self, admin, request).await
    }
}
