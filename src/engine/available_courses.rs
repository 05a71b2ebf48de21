//! 可选课程计算
//!
//! 先修条件只检查直接先修课程，不递归检查先修课程自己的先修。

use std::collections::HashSet;

use crate::models::academic::entities::{AcademicRecord, Remark};
use crate::models::catalog::entities::{Course, Term};

/// 学生的课程通过 / 不及格集合（跨所有选课记录）
#[derive(Debug, Clone, Default)]
pub struct CourseHistory {
    passed: HashSet<String>,
    failed: HashSet<String>,
}

impl CourseHistory {
    pub fn from_records(records: &[AcademicRecord]) -> Self {
        let mut history = Self::default();
        for record in records {
            match record.remark {
                Some(Remark::Passed) => {
                    history.passed.insert(record.course_code.clone());
                }
                Some(Remark::Failed) => {
                    history.failed.insert(record.course_code.clone());
                }
                None => {}
            }
        }
        history
    }

    pub fn has_passed(&self, code: &str) -> bool {
        self.passed.contains(code)
    }

    pub fn has_failed(&self, code: &str) -> bool {
        self.failed.contains(code)
    }
}

/// 从目标学期的全部课程中筛选可选课程
///
/// `candidates` 必须是目标 (年级, 学期) 的课程。
///
/// - 首次选课且目标为 First Year, First Semester：只保留无先修课程的
/// - 其他首次选课目标：全部课程
/// - 非首次：无先修或直接先修全部通过的课程，加上同年级同学期不及格重修的课程，
///   再去掉已通过的课程
pub fn resolve_available(
    candidates: Vec<Course>,
    target: Term,
    is_first_time: bool,
    history: &CourseHistory,
) -> Vec<Course> {
    let mut seen = HashSet::new();
    let mut available = Vec::with_capacity(candidates.len());

    for course in candidates {
        let eligible = if is_first_time {
            target != Term::first() || course.prerequisites.is_empty()
        } else {
            let prerequisites_met = course
                .prerequisites
                .iter()
                .all(|code| history.has_passed(code));
            let retake = history.has_failed(&course.code) && course.term() == target;
            (prerequisites_met || retake) && !history.has_passed(&course.code)
        };

        if eligible && seen.insert(course.code.clone()) {
            available.push(course);
        }
    }

    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::entities::{Semester, YearLevel};

    fn course(code: &str, term: Term, prerequisites: &[&str]) -> Course {
        Course {
            code: code.to_string(),
            name: code.to_string(),
            year_level: term.year_level,
            semester: term.semester,
            units: 3,
            lec_hours: 2,
            lab_hours: 1,
            program_id: None,
            professor_id: None,
            remarks: None,
            prerequisites: prerequisites.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn record(code: &str, remark: Remark) -> AcademicRecord {
        AcademicRecord {
            id: 0,
            course_code: code.to_string(),
            enrollment_id: 1,
            student_id: 1,
            remark: Some(remark),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn codes(courses: &[Course]) -> Vec<&str> {
        courses.iter().map(|c| c.code.as_str()).collect()
    }

    #[test]
    fn test_first_time_first_term_only_without_prerequisites() {
        let target = Term::first();
        let candidates = vec![
            course("IT101", target, &[]),
            course("IT102", target, &["IT100"]),
            course("GE101", target, &[]),
        ];

        let result = resolve_available(candidates, target, true, &CourseHistory::default());
        assert_eq!(codes(&result), vec!["IT101", "GE101"]);
    }

    #[test]
    fn test_first_time_other_term_is_unfiltered() {
        let target = Term::new(YearLevel::Second, Semester::First);
        let candidates = vec![
            course("IT201", target, &["IT101"]),
            course("IT202", target, &[]),
        ];

        let result = resolve_available(candidates, target, true, &CourseHistory::default());
        assert_eq!(codes(&result), vec!["IT201", "IT202"]);
    }

    #[test]
    fn test_returning_student_prerequisites() {
        let target = Term::new(YearLevel::First, Semester::Second);
        let history = CourseHistory::from_records(&[
            record("IT101", Remark::Passed),
            record("GE101", Remark::Failed),
        ]);
        let candidates = vec![
            course("IT102", target, &["IT101"]),
            course("GE102", target, &["GE101"]),
            course("PE102", target, &[]),
            course("IT103", target, &["IT101", "GE101"]),
        ];

        let result = resolve_available(candidates, target, false, &history);
        assert_eq!(codes(&result), vec!["IT102", "PE102"]);
    }

    #[test]
    fn test_passed_course_never_reappears() {
        let target = Term::first();
        let history = CourseHistory::from_records(&[
            record("IT101", Remark::Failed),
            record("IT101", Remark::Passed),
            record("GE101", Remark::Passed),
        ]);
        let candidates = vec![course("IT101", target, &[]), course("GE101", target, &[])];

        let result = resolve_available(candidates, target, false, &history);
        assert!(result.is_empty());
    }

    #[test]
    fn test_failed_course_is_retakable_in_same_term() {
        let target = Term::first();
        let history = CourseHistory::from_records(&[
            record("IT100", Remark::Failed),
            record("IT101", Remark::Failed),
        ]);
        // IT101 的先修没有通过，但本身不及格，可以重修
        let candidates = vec![course("IT101", target, &["IT100"])];

        let result = resolve_available(candidates, target, false, &history);
        assert_eq!(codes(&result), vec!["IT101"]);
    }

    #[test]
    fn test_result_is_deduplicated() {
        let target = Term::first();
        let candidates = vec![course("IT101", target, &[]), course("IT101", target, &[])];

        let result = resolve_available(candidates, target, false, &CourseHistory::default());
        assert_eq!(result.len(), 1);
    }
}
