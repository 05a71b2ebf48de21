use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_label_enum! {
    /// 年级，按 First < Second < Third < Fourth 排序
    #[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
    pub enum YearLevel {
        First => "First Year",
        Second => "Second Year",
        Third => "Third Year",
        Fourth => "Fourth Year",
    }
}

impl YearLevel {
    /// 下一个年级，Fourth Year 之后不再前进
    pub fn next(&self) -> YearLevel {
        match self {
            YearLevel::First => YearLevel::Second,
            YearLevel::Second => YearLevel::Third,
            YearLevel::Third | YearLevel::Fourth => YearLevel::Fourth,
        }
    }

    /// 上一个年级，First Year 没有上一级
    pub fn previous(&self) -> Option<YearLevel> {
        match self {
            YearLevel::First => None,
            YearLevel::Second => Some(YearLevel::First),
            YearLevel::Third => Some(YearLevel::Second),
            YearLevel::Fourth => Some(YearLevel::Third),
        }
    }
}

define_label_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
    pub enum Semester {
        First => "First Semester",
        Second => "Second Semester",
    }
}

impl Semester {
    pub fn other(&self) -> Semester {
        match self {
            Semester::First => Semester::Second,
            Semester::Second => Semester::First,
        }
    }
}

define_label_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
    pub enum Weekday {
        Monday => "Monday",
        Tuesday => "Tuesday",
        Wednesday => "Wednesday",
        Thursday => "Thursday",
        Friday => "Friday",
        Saturday => "Saturday",
        Sunday => "Sunday",
    }
}

/// 学期坐标（年级 + 学期）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct Term {
    pub year_level: YearLevel,
    pub semester: Semester,
}

impl Term {
    pub const fn new(year_level: YearLevel, semester: Semester) -> Self {
        Self {
            year_level,
            semester,
        }
    }

    pub const fn first() -> Self {
        Self::new(YearLevel::First, Semester::First)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.year_level, self.semester)
    }
}

// 专业
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct Program {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub duration: i32,
    pub department: String,
    pub is_active: bool,
}

// 教师
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct Professor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub room: String,
}

impl Professor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct Course {
    pub code: String,
    pub name: String,
    pub year_level: YearLevel,
    pub semester: Semester,
    pub units: i32,
    pub lec_hours: i32,
    pub lab_hours: i32,
    pub program_id: Option<i64>,
    pub professor_id: Option<i64>,
    pub remarks: Option<String>,
    /// 直接先修课程代码
    pub prerequisites: Vec<String>,
}

impl Course {
    pub fn total_hours(&self) -> i32 {
        self.lec_hours + self.lab_hours
    }

    pub fn term(&self) -> Term {
        Term::new(self.year_level, self.semester)
    }
}

// 班级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct Section {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub program_id: Option<i64>,
    pub year_level: YearLevel,
}

// 学年
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct AcademicYear {
    pub id: i64,
    pub label: String,
}

// 课表时段
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct Schedule {
    pub mis_code: String,
    pub section_id: i64,
    pub course_code: String,
    pub day: Weekday,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
}

impl Schedule {
    /// 例如 "Monday 08:00-10:00"
    pub fn day_time(&self) -> String {
        format!(
            "{} {}-{}",
            self.day,
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_level_order_and_saturation() {
        assert!(YearLevel::First < YearLevel::Second);
        assert!(YearLevel::Third < YearLevel::Fourth);
        assert_eq!(YearLevel::Third.next(), YearLevel::Fourth);
        assert_eq!(YearLevel::Fourth.next(), YearLevel::Fourth);
        assert_eq!(YearLevel::First.previous(), None);
        assert_eq!(YearLevel::Fourth.previous(), Some(YearLevel::Third));
    }

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for level in YearLevel::ALL {
            assert_eq!(level.as_str().parse::<YearLevel>(), Ok(*level));
        }
        assert_eq!("Second Semester".parse::<Semester>(), Ok(Semester::Second));
        assert!("Fifth Year".parse::<YearLevel>().is_err());
    }

    #[test]
    fn test_label_serialization() {
        let json = serde_json::to_string(&Term::first()).unwrap();
        assert_eq!(
            json,
            r#"{"year_level":"First Year","semester":"First Semester"}"#
        );
    }

    #[test]
    fn test_schedule_day_time() {
        let schedule = Schedule {
            mis_code: "AB123".into(),
            section_id: 1,
            course_code: "IT101".into(),
            day: Weekday::Monday,
            start_time: chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: chrono::NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        };
        assert_eq!(schedule.day_time(), "Monday 08:00-10:30");
    }
}
