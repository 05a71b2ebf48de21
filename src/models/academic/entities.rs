use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_label_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
    pub enum Remark {
        Passed => "Passed",
        Failed => "Failed",
    }
}

// 学业记录：某次选课中某门课程的结果
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct AcademicRecord {
    pub id: i64,
    pub course_code: String,
    pub enrollment_id: i64,
    pub student_id: i64,
    pub remark: Option<Remark>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
