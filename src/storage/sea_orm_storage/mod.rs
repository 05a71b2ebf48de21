//! SeaORM 存储实现，按连接 URL 选择 SQLite、PostgreSQL 或 MySQL。

mod academic_histories;
mod academic_years;
mod courses;
mod enrollments;
mod identity;
mod programs;
mod schedules;
mod sections;

use super::StorageSettings;
use crate::config::AppConfig;
use crate::errors::{EnrollSysError, Result};
use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Sqlite,
    Postgres,
    MySql,
}

impl Backend {
    /// 识别后端并规范化 URL；裸文件路径视为 SQLite
    fn detect(url: &str) -> Result<(Self, String)> {
        const SERVER_SCHEMES: &[(&str, Backend)] = &[
            ("postgres://", Backend::Postgres),
            ("postgresql://", Backend::Postgres),
            ("mysql://", Backend::MySql),
            ("mariadb://", Backend::MySql),
        ];

        if url.starts_with("sqlite:") {
            return Ok((Backend::Sqlite, url.to_string()));
        }
        if let Some((_, backend)) = SERVER_SCHEMES.iter().find(|(p, _)| url.starts_with(p)) {
            return Ok((*backend, url.to_string()));
        }
        if [".db", ".sqlite", ".sqlite3"].iter().any(|ext| url.ends_with(ext)) {
            return Ok((Backend::Sqlite, format!("sqlite://{url}?mode=rwc")));
        }

        Err(EnrollSysError::database_config(format!(
            "无法识别数据库类型: {url}（支持 sqlite://、postgres://、mysql:// 或 .db 文件路径）"
        )))
    }
}

#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    pub(crate) settings: StorageSettings,
}

impl SeaOrmStorage {
    /// 按全局配置建立连接并执行迁移
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let (backend, url) = Backend::detect(&config.database.url)?;

        let db = match backend {
            Backend::Sqlite => Self::connect_sqlite(&url, config).await?,
            Backend::Postgres | Backend::MySql => Self::connect_server(&url, config).await?,
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("Storage ready ({:?})", backend);

        Ok(Self {
            db,
            settings: StorageSettings::from_config(config),
        })
    }

    /// 使用已有连接创建存储实例（不运行迁移）
    pub fn with_connection(db: DatabaseConnection, settings: StorageSettings) -> Self {
        Self { db, settings }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| EnrollSysError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // 选课提交在写锁上排队
            .busy_timeout(Duration::from_secs(10))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size.max(1))
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .connect_with(options)
            .await
            .map_err(|e| EnrollSysError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    async fn connect_server(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let timeout = Duration::from_secs(config.database.timeout);
        let mut options = ConnectOptions::new(url);
        options
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .idle_timeout(Duration::from_secs(600))
            .sqlx_logging(false);

        Database::connect(options)
            .await
            .map_err(|e| EnrollSysError::database_connection(format!("无法连接到数据库: {e}")))
    }
}

use crate::models::{
    academic::{entities::AcademicRecord, responses::HistoryEntry},
    catalog::{
        entities::{AcademicYear, Course, Professor, Program, Schedule, Section, Term, YearLevel},
        requests::{
            CreateCourseRequest, CreateProfessorRequest, CreateProgramRequest,
            CreateScheduleRequest, CreateSectionRequest, SectionCapacityQuery, TermQuery,
            UpdateProgramRequest,
        },
        responses::SectionCapacity,
    },
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::{EnrollmentListQuery, NewEnrollment, RemarkEntry},
        responses::{EnrollDetailView, EnrollmentListResponse, SubmittedEnrollment},
    },
    users::{
        entities::{Admin, Identity, Student},
        requests::{CreateAdminRequest, NewStudent, StudentListQuery},
        responses::StudentListResponse,
    },
};
use crate::storage::{ScheduleRow, Storage};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 身份模块
    async fn create_student(&self, student: NewStudent) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn create_admin(&self, admin: CreateAdminRequest) -> Result<Admin> {
        self.create_admin_impl(admin).await
    }

    async fn get_admin_by_id(&self, id: i64) -> Result<Option<Admin>> {
        self.get_admin_by_id_impl(id).await
    }

    async fn get_admin_by_user_id(&self, user_id: i64) -> Result<Option<Admin>> {
        self.get_admin_by_user_id_impl(user_id).await
    }

    async fn count_admins(&self) -> Result<u64> {
        self.count_admins_impl().await
    }

    async fn find_identity(
        &self,
        id: i64,
        date_of_birth: chrono::NaiveDate,
    ) -> Result<Option<Identity>> {
        self.find_identity_impl(id, date_of_birth).await
    }

    // 课程目录模块
    async fn create_program(&self, program: CreateProgramRequest) -> Result<Program> {
        self.create_program_impl(program).await
    }

    async fn get_program_by_code(&self, code: &str) -> Result<Option<Program>> {
        self.get_program_by_code_impl(code).await
    }

    async fn list_programs(&self) -> Result<Vec<Program>> {
        self.list_programs_impl().await
    }

    async fn update_program(
        &self,
        id: i64,
        update: UpdateProgramRequest,
    ) -> Result<Option<Program>> {
        self.update_program_impl(id, update).await
    }

    async fn create_professor(&self, professor: CreateProfessorRequest) -> Result<Professor> {
        self.create_professor_impl(professor).await
    }

    async fn list_professors(&self) -> Result<Vec<Professor>> {
        self.list_professors_impl().await
    }

    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_impl(code).await
    }

    async fn list_courses(&self, query: TermQuery) -> Result<Vec<Course>> {
        self.list_courses_impl(query).await
    }

    async fn list_courses_by_codes(&self, codes: &[String]) -> Result<Vec<Course>> {
        self.list_courses_by_codes_impl(codes).await
    }

    async fn create_section(&self, section: CreateSectionRequest) -> Result<Section> {
        self.create_section_impl(section).await
    }

    async fn get_section(&self, id: i64) -> Result<Option<Section>> {
        self.get_section_impl(id).await
    }

    async fn list_sections(&self, year_level: Option<YearLevel>) -> Result<Vec<Section>> {
        self.list_sections_impl(year_level).await
    }

    async fn create_academic_year(&self, label: &str) -> Result<AcademicYear> {
        self.create_academic_year_impl(label).await
    }

    async fn get_academic_year(&self, id: i64) -> Result<Option<AcademicYear>> {
        self.get_academic_year_impl(id).await
    }

    async fn current_academic_year(&self) -> Result<Option<AcademicYear>> {
        self.current_academic_year_impl().await
    }

    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>> {
        self.list_academic_years_impl().await
    }

    async fn create_schedule(&self, schedule: CreateScheduleRequest) -> Result<Schedule> {
        self.create_schedule_impl(schedule).await
    }

    async fn list_schedules_by_course(&self, course_code: &str) -> Result<Vec<ScheduleRow>> {
        self.list_schedules_by_course_impl(course_code).await
    }

    async fn list_schedules(&self, query: TermQuery) -> Result<Vec<ScheduleRow>> {
        self.list_schedules_impl(query).await
    }

    async fn section_capacities(
        &self,
        query: SectionCapacityQuery,
    ) -> Result<Vec<SectionCapacity>> {
        self.section_capacities_impl(query).await
    }

    // 选课模块
    async fn has_any_enrollment(&self, student_id: i64) -> Result<bool> {
        self.has_any_enrollment_impl(student_id).await
    }

    async fn list_student_enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        self.list_student_enrollments_impl(student_id).await
    }

    async fn list_enrollments_in_year(
        &self,
        student_id: i64,
        academic_year_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Vec<Enrollment>> {
        self.list_enrollments_in_year_impl(student_id, academic_year_id, status)
            .await
    }

    async fn find_term_enrollment(
        &self,
        student_id: i64,
        academic_year_id: i64,
        term: Term,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        self.find_term_enrollment_impl(student_id, academic_year_id, term, status)
            .await
    }

    async fn get_enrollment(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(id).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        self.list_enrollments_with_pagination_impl(query).await
    }

    async fn list_enroll_detail_views(&self, enrollment_id: i64) -> Result<Vec<EnrollDetailView>> {
        self.list_enroll_detail_views_impl(enrollment_id).await
    }

    async fn create_regular_enrollment(
        &self,
        enrollment: NewEnrollment,
    ) -> Result<SubmittedEnrollment> {
        self.create_regular_enrollment_impl(enrollment).await
    }

    async fn create_irregular_enrollment(
        &self,
        enrollment: NewEnrollment,
        mis_codes: Vec<String>,
    ) -> Result<SubmittedEnrollment> {
        self.create_irregular_enrollment_impl(enrollment, mis_codes)
            .await
    }

    async fn update_enrollment_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_status_impl(id, status).await
    }

    // 学业记录模块
    async fn list_student_records(&self, student_id: i64) -> Result<Vec<AcademicRecord>> {
        self.list_student_records_impl(student_id).await
    }

    async fn list_enrollment_records(&self, enrollment_id: i64) -> Result<Vec<AcademicRecord>> {
        self.list_enrollment_records_impl(enrollment_id).await
    }

    async fn upsert_remarks(
        &self,
        enrollment: &Enrollment,
        entries: Vec<RemarkEntry>,
    ) -> Result<Vec<AcademicRecord>> {
        self.upsert_remarks_impl(enrollment, entries).await
    }

    async fn list_history_entries(&self, student_id: i64) -> Result<Vec<HistoryEntry>> {
        self.list_history_entries_impl(student_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_detection() {
        let (backend, url) = Backend::detect("sqlite://data.db?mode=rwc").unwrap();
        assert_eq!((backend, url.as_str()), (Backend::Sqlite, "sqlite://data.db?mode=rwc"));

        let (backend, url) = Backend::detect("enroll.db").unwrap();
        assert_eq!(backend, Backend::Sqlite);
        assert_eq!(url, "sqlite://enroll.db?mode=rwc");

        assert_eq!(Backend::detect("postgresql://u@h/db").unwrap().0, Backend::Postgres);
        assert_eq!(Backend::detect("mariadb://u@h/db").unwrap().0, Backend::MySql);
        assert!(Backend::detect("oracle://u@h/db").is_err());
    }
}
