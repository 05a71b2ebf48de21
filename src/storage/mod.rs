use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{
    academic::{entities::AcademicRecord, responses::HistoryEntry},
    catalog::{
        entities::{
            AcademicYear, Course, Professor, Program, Schedule, Section, Semester, Term, YearLevel,
        },
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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 存储层运行参数
///
/// 由配置构建，测试中可直接构造，存储层本身不读取全局配置。
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// 第一个管理员 ID
    pub admin_id_start: i64,
    /// 生成 MIS 码的最大尝试次数
    pub mis_code_max_attempts: u32,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            admin_id_start: 20001,
            mis_code_max_attempts: 32,
        }
    }
}

impl StorageSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            admin_id_start: config.enrollment.admin_id_start,
            mis_code_max_attempts: config.enrollment.mis_code_max_attempts,
        }
    }
}

/// 课表时段及其展示所需的关联数据
#[derive(Debug, Clone)]
pub struct ScheduleRow {
    pub schedule: Schedule,
    pub course: Course,
    pub section: Section,
    /// 班级所属专业代码，缺省时回退到课程所属专业
    pub program_code: Option<String>,
    pub professor: Option<Professor>,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 身份管理方法
    // 注册学生（同时创建登录用户）
    async fn create_student(&self, student: NewStudent) -> Result<Student>;
    // 通过ID获取学生信息
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    // 通过登录用户ID获取学生信息
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    // 列出学生
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    // 创建管理员（ID 顺延分配）
    async fn create_admin(&self, admin: CreateAdminRequest) -> Result<Admin>;
    // 通过ID获取管理员信息
    async fn get_admin_by_id(&self, id: i64) -> Result<Option<Admin>>;
    // 通过登录用户ID获取管理员信息
    async fn get_admin_by_user_id(&self, user_id: i64) -> Result<Option<Admin>>;
    // 管理员数量
    async fn count_admins(&self) -> Result<u64>;
    // 通过 ID + 出生日期查找登录身份，先学生后管理员
    async fn find_identity(
        &self,
        id: i64,
        date_of_birth: chrono::NaiveDate,
    ) -> Result<Option<Identity>>;

    /// 课程目录方法
    async fn create_program(&self, program: CreateProgramRequest) -> Result<Program>;
    async fn get_program_by_code(&self, code: &str) -> Result<Option<Program>>;
    async fn list_programs(&self) -> Result<Vec<Program>>;
    async fn update_program(
        &self,
        id: i64,
        update: UpdateProgramRequest,
    ) -> Result<Option<Program>>;
    async fn create_professor(&self, professor: CreateProfessorRequest) -> Result<Professor>;
    async fn list_professors(&self) -> Result<Vec<Professor>>;
    // 创建课程及其先修关系
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course(&self, code: &str) -> Result<Option<Course>>;
    // 按年级/学期列出课程（含先修课程代码）
    async fn list_courses(&self, query: TermQuery) -> Result<Vec<Course>>;
    async fn list_courses_by_codes(&self, codes: &[String]) -> Result<Vec<Course>>;
    async fn create_section(&self, section: CreateSectionRequest) -> Result<Section>;
    async fn get_section(&self, id: i64) -> Result<Option<Section>>;
    async fn list_sections(&self, year_level: Option<YearLevel>) -> Result<Vec<Section>>;
    async fn create_academic_year(&self, label: &str) -> Result<AcademicYear>;
    async fn get_academic_year(&self, id: i64) -> Result<Option<AcademicYear>>;
    // 当前学年：最近创建的一条
    async fn current_academic_year(&self) -> Result<Option<AcademicYear>>;
    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>>;
    // 创建课表时段，MIS 码通过插入冲突重试预留
    async fn create_schedule(&self, schedule: CreateScheduleRequest) -> Result<Schedule>;
    // 按课程列出课表时段（按班级名、星期排序）
    async fn list_schedules_by_course(&self, course_code: &str) -> Result<Vec<ScheduleRow>>;
    // 按课程年级/学期列出课表时段
    async fn list_schedules(&self, query: TermQuery) -> Result<Vec<ScheduleRow>>;
    // 班级容量读模型
    async fn section_capacities(
        &self,
        query: SectionCapacityQuery,
    ) -> Result<Vec<SectionCapacity>>;

    /// 选课记录方法
    // 学生是否有过任何选课记录
    async fn has_any_enrollment(&self, student_id: i64) -> Result<bool>;
    // 学生的全部选课记录（按学年、学期、ID 排序）
    async fn list_student_enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>>;
    // 学生在某学年内指定状态的选课记录（按学期、ID 排序）
    async fn list_enrollments_in_year(
        &self,
        student_id: i64,
        academic_year_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Vec<Enrollment>>;
    // 学生在某学年某学期坐标上指定状态的最新选课记录
    async fn find_term_enrollment(
        &self,
        student_id: i64,
        academic_year_id: i64,
        term: Term,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>>;
    async fn get_enrollment(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse>;
    // 选课明细（带课程与班级）
    async fn list_enroll_detail_views(&self, enrollment_id: i64) -> Result<Vec<EnrollDetailView>>;
    // 整班选课：在同一事务中选择有余量的班级并绑定该学期全部时段
    async fn create_regular_enrollment(
        &self,
        enrollment: NewEnrollment,
    ) -> Result<SubmittedEnrollment>;
    // 按课程选课：绑定可解析的 MIS 码，未知的码跳过
    async fn create_irregular_enrollment(
        &self,
        enrollment: NewEnrollment,
        mis_codes: Vec<String>,
    ) -> Result<SubmittedEnrollment>;
    // 无条件写入状态
    async fn update_enrollment_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>>;

    /// 学业记录方法
    async fn list_student_records(&self, student_id: i64) -> Result<Vec<AcademicRecord>>;
    async fn list_enrollment_records(&self, enrollment_id: i64) -> Result<Vec<AcademicRecord>>;
    // 按 (选课记录, 课程, 学生) 写入或覆盖成绩备注
    async fn upsert_remarks(
        &self,
        enrollment: &Enrollment,
        entries: Vec<RemarkEntry>,
    ) -> Result<Vec<AcademicRecord>>;
    // 学生的完整学业记录（按学年、学期排序）
    async fn list_history_entries(&self, student_id: i64) -> Result<Vec<HistoryEntry>>;
}

/// 学期筛选的辅助组合
pub fn term_query(year_level: YearLevel, semester: Semester) -> TermQuery {
    TermQuery {
        year_level: Some(year_level),
        semester: Some(semester),
    }
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
