use serde::Serialize;
use ts_rs::TS;

use super::entities::{EnrollDetail, Enrollment};
use crate::models::academic::entities::AcademicRecord;
use crate::models::catalog::entities::{AcademicYear, Schedule, Section, Term};
use crate::models::catalog::responses::{CourseBrief, CourseListItem};
use crate::models::common::PaginatedResponse;
use crate::models::users::entities::Student;

// 学生选课概览
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentOverview {
    pub academic_year: AcademicYear,
    pub default_term: Term,
    pub is_first_time: bool,
    pub is_regular: bool,
    pub failed_courses: Vec<CourseBrief>,
    pub available_courses: Vec<CourseListItem>,
    pub pending_enrollment: Option<Enrollment>,
    pub approved_enrollment: Option<Enrollment>,
    /// 手动选择年级不合法时的提示
    pub validation_error: Option<String>,
    pub sections: Vec<Section>,
}

// 明细行（带课程与班级信息）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollDetailView {
    pub detail: EnrollDetail,
    pub schedule: Schedule,
    pub course: CourseBrief,
    pub section: String,
    pub day_time: String,
}

// 选课记录列表项
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentSummary {
    pub enrollment: Enrollment,
    pub student_name: String,
    pub academic_year: String,
}

pub type EnrollmentListResponse = PaginatedResponse<EnrollmentSummary>;

// 选课记录详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentDetailResponse {
    pub enrollment: Enrollment,
    pub student: Student,
    pub academic_year: AcademicYear,
    pub details: Vec<EnrollDetailView>,
    pub remarks: Vec<AcademicRecord>,
}

// 提交选课结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct SubmittedEnrollment {
    pub enrollment: Enrollment,
    pub details: Vec<EnrollDetail>,
}

// 学生课表中的一次选课
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct ScheduleEnrollment {
    pub enrollment: Enrollment,
    pub academic_year: String,
    pub details: Vec<EnrollDetailView>,
}
