use serde::Serialize;
use ts_rs::TS;

use super::entities::{Course, Semester, Weekday, YearLevel};

// 课程列表项（附带总学时）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CourseListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub course: Course,
    pub total_hours: i32,
}

impl From<Course> for CourseListItem {
    fn from(course: Course) -> Self {
        let total_hours = course.total_hours();
        Self {
            course,
            total_hours,
        }
    }
}

// 课程简要信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CourseBrief {
    pub code: String,
    pub name: String,
    pub units: i32,
}

impl From<&Course> for CourseBrief {
    fn from(course: &Course) -> Self {
        Self {
            code: course.code.clone(),
            name: course.name.clone(),
            units: course.units,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

// 按班级分组的课程时段（选课时供非正常学生挑选）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct SectionScheduleGroup {
    /// 逗号拼接的 MIS 码，整体作为一次选择提交
    pub mis_code: String,
    pub display: String,
    pub section: String,
    pub day: String,
    pub time: String,
    pub raw_days: Vec<Weekday>,
    pub raw_times: Vec<TimeRange>,
    pub room: String,
    pub course_code: String,
    pub course_name: String,
}

// 按 (课程, 班级) 分组的课表（管理端）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CourseScheduleGroup {
    pub mis_codes: Vec<String>,
    pub course_code: String,
    pub course_name: String,
    pub year_level: YearLevel,
    pub semester: Semester,
    pub section: String,
    pub professor: Option<String>,
    pub room: String,
    pub days_times: Vec<String>,
}

// 班级容量读模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct SectionCapacity {
    pub section_id: i64,
    pub section_name: String,
    pub year_level: YearLevel,
    pub semester: Semester,
    pub capacity: i32,
    pub enrolled: i64,
    pub pending: i64,
    pub available: i64,
}
