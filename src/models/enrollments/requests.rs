use serde::Deserialize;
use ts_rs::TS;

use super::entities::{EnrollmentStatus, EnrollmentType};
use crate::models::academic::entities::Remark;
use crate::models::catalog::entities::{Semester, YearLevel};
use crate::models::common::PaginationQuery;

// 提交选课请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct SubmitEnrollmentRequest {
    pub enrollment_type: EnrollmentType,
    pub year_level: Option<YearLevel>,
    pub semester: Option<Semester>,
    /// 每项为一次选择，可能是逗号拼接的多个 MIS 码
    #[serde(default)]
    pub course_schedules: Vec<String>,
}

// 选课概览查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct OverviewQuery {
    /// 手动选择的年级，仅用于校验
    pub year_level: Option<YearLevel>,
    /// 首次选课学生主动选择按课程挑选
    #[serde(default)]
    pub force_irregular: bool,
    /// 发起新一轮选课时不再展示已通过的记录
    #[serde(default)]
    pub new_enrollment: bool,
}

// 学生课表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct StudentScheduleQuery {
    pub year_level: Option<YearLevel>,
    pub semester: Option<Semester>,
}

// 选课记录列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<EnrollmentStatus>,
    pub academic_year_id: Option<i64>,
}

// 选课记录列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct EnrollmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<EnrollmentStatus>,
    pub academic_year_id: Option<i64>,
    pub student_id: Option<i64>,
}

impl From<EnrollmentListParams> for EnrollmentListQuery {
    fn from(params: EnrollmentListParams) -> Self {
        Self {
            page: params.pagination.page,
            size: params.pagination.size,
            // 默认只看待审核
            status: Some(params.status.unwrap_or(EnrollmentStatus::Pending)),
            academic_year_id: params.academic_year_id,
            student_id: None,
        }
    }
}

// 单门课程的成绩备注
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct RemarkEntry {
    pub course_code: String,
    pub remark: Remark,
}

// 录入成绩备注请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct RecordRemarksRequest {
    pub remarks: Vec<RemarkEntry>,
}

// 新选课记录（存储层使用）
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: i64,
    pub academic_year_id: i64,
    pub year_level: YearLevel,
    pub semester: Semester,
    pub is_regular: bool,
}
