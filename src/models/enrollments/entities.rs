use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::catalog::entities::{Semester, Term, YearLevel};

define_label_enum! {
    /// 选课状态，Pending -> Approved | Rejected，后两者为终态
    #[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
    pub enum EnrollmentStatus {
        Pending => "Pending",
        Approved => "Approved",
        Rejected => "Rejected",
    }
}

impl EnrollmentStatus {
    /// 是否占用名额（待审核和已通过都占）
    pub fn holds_seat(&self) -> bool {
        matches!(self, EnrollmentStatus::Pending | EnrollmentStatus::Approved)
    }
}

// 选课方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum EnrollmentType {
    Regular,   // 整班选课
    Irregular, // 按课程挑选时段
}

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub section_id: Option<i64>,
    pub academic_year_id: i64,
    pub year_level: YearLevel,
    pub semester: Semester,
    pub status: EnrollmentStatus,
    pub is_regular: bool,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

impl Enrollment {
    pub fn term(&self) -> Term {
        Term::new(self.year_level, self.semester)
    }
}

// 选课明细（选课记录与课表时段的关联）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollDetail {
    pub id: i64,
    pub enrollment_id: i64,
    pub mis_code: String,
}
