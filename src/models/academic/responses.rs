use serde::Serialize;
use ts_rs::TS;

use super::entities::AcademicRecord;
use crate::models::catalog::entities::{Semester, YearLevel};

// 学业记录条目（带课程信息）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct HistoryEntry {
    pub record: AcademicRecord,
    pub course_name: String,
    pub units: i32,
    pub academic_year: String,
    pub year_level: YearLevel,
    pub semester: Semester,
}

// 按 (学年, 学期) 分组的学业记录
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct HistoryGroup {
    pub academic_year: String,
    pub semester: Semester,
    pub year_level: YearLevel,
    pub records: Vec<HistoryEntry>,
}
