//! 正常 / 非正常学生分类

use crate::models::academic::entities::{AcademicRecord, Remark};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regularity {
    pub is_regular: bool,
    /// 不及格课程代码（去重，按出现顺序）
    pub failed_courses: Vec<String>,
}

impl Regularity {
    pub fn regular() -> Self {
        Self {
            is_regular: true,
            failed_courses: Vec::new(),
        }
    }
}

/// 根据最近一次已通过选课的成绩备注分类
///
/// 只要有一门 Failed 即为非正常学生。
pub fn classify(latest_records: &[AcademicRecord]) -> Regularity {
    let mut failed_courses: Vec<String> = Vec::new();
    for record in latest_records {
        if record.remark == Some(Remark::Failed) && !failed_courses.contains(&record.course_code) {
            failed_courses.push(record.course_code.clone());
        }
    }

    Regularity {
        is_regular: failed_courses.is_empty(),
        failed_courses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(course_code: &str, remark: Option<Remark>) -> AcademicRecord {
        AcademicRecord {
            id: 0,
            course_code: course_code.to_string(),
            enrollment_id: 1,
            student_id: 1,
            remark,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_no_records_is_regular() {
        assert_eq!(classify(&[]), Regularity::regular());
    }

    #[test]
    fn test_all_passed_is_regular() {
        let records = [
            record("IT101", Some(Remark::Passed)),
            record("IT102", None),
        ];
        assert!(classify(&records).is_regular);
    }

    #[test]
    fn test_any_failed_is_irregular() {
        let records = [
            record("IT101", Some(Remark::Passed)),
            record("IT102", Some(Remark::Failed)),
            record("IT103", Some(Remark::Failed)),
        ];
        let result = classify(&records);
        assert!(!result.is_regular);
        assert_eq!(result.failed_courses, vec!["IT102", "IT103"]);
    }
}
