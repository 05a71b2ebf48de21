//! 年级与学期推进规则

use crate::models::catalog::entities::{Semester, Term, YearLevel};
use crate::models::enrollments::entities::Enrollment;

/// 按 (学期, ID) 取最近的一条选课记录
pub fn latest_in_year(enrollments: &[Enrollment]) -> Option<&Enrollment> {
    enrollments.iter().max_by_key(|e| (e.semester, e.id))
}

/// 按 (学年, 学期, ID) 取最近的一条选课记录
pub fn latest_overall(enrollments: &[Enrollment]) -> Option<&Enrollment> {
    enrollments
        .iter()
        .max_by_key(|e| (e.academic_year_id, e.semester, e.id))
}

/// 根据本学年已通过的选课记录计算默认学期坐标
///
/// - 没有记录：First Year, First Semester
/// - 一条记录：First Semester 之后进入同年级 Second Semester；
///   Second Semester 之后进入下一年级 First Semester
/// - 两条及以上：最近一条的下一年级 First Semester
///
/// Fourth Year 不会再前进。
pub fn default_term(approved_this_year: &[Enrollment]) -> Term {
    let Some(last) = latest_in_year(approved_this_year) else {
        return Term::first();
    };

    if approved_this_year.len() == 1 && last.semester == Semester::First {
        return Term::new(last.year_level, Semester::Second);
    }

    Term::new(last.year_level.next(), Semester::First)
}

/// 年级越级检查
///
/// 选择高于默认年级时，必须在本学年已通过上一年级的 Second Semester。
pub fn check_year_level_override(
    selected: YearLevel,
    default: Term,
    completed_previous: bool,
) -> Result<(), String> {
    if selected <= default.year_level || completed_previous {
        return Ok(());
    }

    let previous = selected.previous().unwrap_or(YearLevel::First);
    Err(format!(
        "You can't enroll in {selected} because you haven't completed {previous} in the current academic year"
    ))
}

/// 年级回退检查：不能低于最近一次通过的选课年级
pub fn check_regression(selected: YearLevel, latest: Option<YearLevel>) -> Result<(), String> {
    match latest {
        Some(latest) if selected < latest => {
            Err("You cannot enroll in a previous year level".to_string())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enrollments::entities::EnrollmentStatus;

    fn approved(id: i64, year_level: YearLevel, semester: Semester) -> Enrollment {
        Enrollment {
            id,
            student_id: 1,
            section_id: None,
            academic_year_id: 1,
            year_level,
            semester,
            status: EnrollmentStatus::Approved,
            is_regular: true,
            enrolled_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_no_enrollments_defaults_to_first_term() {
        assert_eq!(default_term(&[]), Term::first());
    }

    #[test]
    fn test_single_first_semester_moves_to_second() {
        for &year_level in YearLevel::ALL {
            let term = default_term(&[approved(1, year_level, Semester::First)]);
            assert_eq!(term, Term::new(year_level, Semester::Second));
        }
    }

    #[test]
    fn test_single_second_semester_advances_year() {
        let term = default_term(&[approved(1, YearLevel::First, Semester::Second)]);
        assert_eq!(term, Term::new(YearLevel::Second, Semester::First));
    }

    #[test]
    fn test_two_semesters_advance_year() {
        let enrollments = [
            approved(2, YearLevel::Second, Semester::Second),
            approved(1, YearLevel::Second, Semester::First),
        ];
        assert_eq!(
            default_term(&enrollments),
            Term::new(YearLevel::Third, Semester::First)
        );
    }

    #[test]
    fn test_fourth_year_does_not_wrap() {
        let enrollments = [
            approved(1, YearLevel::Fourth, Semester::First),
            approved(2, YearLevel::Fourth, Semester::Second),
        ];
        assert_eq!(
            default_term(&enrollments),
            Term::new(YearLevel::Fourth, Semester::First)
        );
    }

    #[test]
    fn test_override_requires_completed_previous_year() {
        let err =
            check_year_level_override(YearLevel::Third, Term::first(), false).unwrap_err();
        assert_eq!(
            err,
            "You can't enroll in Third Year because you haven't completed Second Year in the current academic year"
        );

        assert!(check_year_level_override(YearLevel::Second, Term::first(), true).is_ok());
        assert!(check_year_level_override(YearLevel::First, Term::first(), false).is_ok());
    }

    #[test]
    fn test_override_never_two_steps_ahead() {
        // 只通过 First Year Second Semester 时，Third Year 仍被拒绝
        let default = Term::new(YearLevel::Second, Semester::First);
        assert!(check_year_level_override(YearLevel::Second, default, false).is_ok());
        assert!(check_year_level_override(YearLevel::Third, default, false).is_err());
    }

    #[test]
    fn test_regression_check() {
        assert!(check_regression(YearLevel::First, Some(YearLevel::Second)).is_err());
        assert!(check_regression(YearLevel::Second, Some(YearLevel::Second)).is_ok());
        assert!(check_regression(YearLevel::First, None).is_ok());
    }
}
