pub mod academic_years;
pub mod courses;
pub mod grouping;
pub mod programs;
pub mod schedules;
pub mod sections;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::catalog::requests::{
    CourseScheduleQuery, CreateAcademicYearRequest, CreateCourseRequest, CreateProfessorRequest,
    CreateProgramRequest, CreateScheduleRequest, CreateSectionRequest, SectionCapacityQuery,
    TermQuery, UpdateProgramRequest,
};
use crate::storage::Storage;

pub struct CatalogService {
    storage: Option<Arc<dyn Storage>>,
}

impl CatalogService {
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

    // 专业
    pub async fn list_programs(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        programs::list_programs(self, request).await
    }

    pub async fn create_program(
        &self,
        program: CreateProgramRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        programs::create_program(self, program, request).await
    }

    pub async fn update_program(
        &self,
        program_id: i64,
        update: UpdateProgramRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        programs::update_program(self, program_id, update, request).await
    }

    // 教师
    pub async fn list_professors(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        programs::list_professors(self, request).await
    }

    pub async fn create_professor(
        &self,
        professor: CreateProfessorRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        programs::create_professor(self, professor, request).await
    }

    // 课程
    pub async fn list_courses(
        &self,
        query: TermQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::list_courses(self, query, request).await
    }

    pub async fn list_course_briefs(
        &self,
        query: TermQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::list_course_briefs(self, query, request).await
    }

    pub async fn get_course(&self, code: &str, request: &HttpRequest) -> ActixResult<HttpResponse> {
        courses::get_course(self, code, request).await
    }

    pub async fn create_course(
        &self,
        course: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::create_course(self, course, request).await
    }

    // 班级
    pub async fn list_sections(
        &self,
        query: TermQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sections::list_sections(self, query, request).await
    }

    pub async fn create_section(
        &self,
        section: CreateSectionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sections::create_section(self, section, request).await
    }

    pub async fn section_capacities(
        &self,
        query: SectionCapacityQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sections::section_capacities(self, query, request).await
    }

    // 学年
    pub async fn list_academic_years(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        academic_years::list_academic_years(self, request).await
    }

    pub async fn current_academic_year(
        &self,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        academic_years::current_academic_year(self, request).await
    }

    pub async fn create_academic_year(
        &self,
        academic_year: CreateAcademicYearRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        academic_years::create_academic_year(self, academic_year, request).await
    }

    // 课表
    pub async fn lookup_schedules(
        &self,
        query: CourseScheduleQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        schedules::lookup_schedules(self, query, request).await
    }

    pub async fn list_schedules(
        &self,
        query: TermQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        schedules::list_schedules(self, query, request).await
    }

    pub async fn create_schedule(
        &self,
        schedule: CreateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        schedules::create_schedule(self, schedule, request).await
    }
}
