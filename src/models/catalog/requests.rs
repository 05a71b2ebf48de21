use serde::Deserialize;
use ts_rs::TS;

use super::entities::{Semester, Weekday, YearLevel};

// 创建专业请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CreateProgramRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

// 更新专业请求（专业代码不可修改）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct UpdateProgramRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

// 创建教师请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CreateProfessorRequest {
    pub first_name: String,
    pub last_name: String,
    pub room: String,
}

// 创建课程请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CreateCourseRequest {
    pub code: String,
    pub name: String,
    pub year_level: YearLevel,
    pub semester: Semester,
    pub units: i32,
    #[serde(default)]
    pub lec_hours: i32,
    #[serde(default)]
    pub lab_hours: i32,
    pub program_id: Option<i64>,
    pub professor_id: Option<i64>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

// 课程查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct TermQuery {
    pub year_level: Option<YearLevel>,
    pub semester: Option<Semester>,
}

// 创建班级请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CreateSectionRequest {
    pub name: String,
    pub capacity: i32,
    pub program_id: Option<i64>,
    pub year_level: YearLevel,
}

// 班级容量查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct SectionCapacityQuery {
    pub academic_year_id: Option<i64>,
    pub year_level: Option<YearLevel>,
}

// 创建学年请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CreateAcademicYearRequest {
    /// 形如 "2024-2025"
    pub label: String,
}

// 创建课表时段请求（MIS 码由系统生成）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CreateScheduleRequest {
    pub section_id: i64,
    pub course_code: String,
    pub day: Weekday,
    #[serde(deserialize_with = "deserialize_clock_time")]
    #[ts(type = "string")]
    pub start_time: chrono::NaiveTime,
    #[serde(deserialize_with = "deserialize_clock_time")]
    #[ts(type = "string")]
    pub end_time: chrono::NaiveTime,
}

// 支持 "HH:MM" 与 "HH:MM:SS" 两种格式
fn deserialize_clock_time<'de, D>(deserializer: D) -> Result<chrono::NaiveTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    chrono::NaiveTime::parse_from_str(&s, "%H:%M")
        .or_else(|_| chrono::NaiveTime::parse_from_str(&s, "%H:%M:%S"))
        .map_err(|_| serde::de::Error::custom(format!("无效的时间: '{s}'. 格式: HH:MM")))
}

// 按课程查询课表
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CourseScheduleQuery {
    pub course_code: String,
}
