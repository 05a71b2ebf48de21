//! 选课提交
//!
//! 提交前依次校验：学期坐标完整、越级、回退，然后按正常 / 非正常分流。
//! 有不及格课程的学生即使选择整班选课也按课程选课处理。

use tracing::info;

use super::EnrollmentContext;
use super::progression::{self, check_regression, check_year_level_override, default_term};
use crate::errors::{EnrollSysError, Result};
use crate::models::catalog::entities::{Semester, Term, YearLevel};
use crate::models::enrollments::{
    entities::{EnrollmentStatus, EnrollmentType},
    requests::{NewEnrollment, SubmitEnrollmentRequest},
    responses::SubmittedEnrollment,
};
use crate::storage::Storage;

/// 拆分提交的时段选择
///
/// 每项可能是逗号拼接的多个 MIS 码；去掉空白与空项，按首次出现去重。
pub fn split_schedule_codes(selections: &[String]) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for selection in selections {
        for code in selection.split(',') {
            let code = code.trim();
            if !code.is_empty() && !codes.iter().any(|c| c == code) {
                codes.push(code.to_string());
            }
        }
    }
    codes
}

/// 校验手动选择的年级，不合法时返回提示
///
/// 高于默认年级时检查越级，同时总是检查是否低于最近一次通过的选课年级。
pub(super) async fn year_level_violation(
    storage: &dyn Storage,
    ctx: &EnrollmentContext,
    selected: YearLevel,
    default: Term,
) -> Result<Option<String>> {
    let student_id = ctx.student_id();

    if selected > default.year_level {
        let completed_previous = match selected.previous() {
            Some(previous) => storage
                .find_term_enrollment(
                    student_id,
                    ctx.academic_year.id,
                    Term::new(previous, Semester::Second),
                    EnrollmentStatus::Approved,
                )
                .await?
                .is_some(),
            None => true,
        };
        if let Err(message) = check_year_level_override(selected, default, completed_previous) {
            return Ok(Some(message));
        }
    }

    let approved_overall: Vec<_> = storage
        .list_student_enrollments(student_id)
        .await?
        .into_iter()
        .filter(|e| e.status == EnrollmentStatus::Approved)
        .collect();

    Ok(check_regression(
        selected,
        progression::latest_overall(&approved_overall).map(|e| e.year_level),
    )
    .err())
}

pub async fn submit_enrollment(
    storage: &dyn Storage,
    ctx: &EnrollmentContext,
    req: SubmitEnrollmentRequest,
) -> Result<SubmittedEnrollment> {
    let (Some(year_level), Some(semester)) = (req.year_level, req.semester) else {
        return Err(EnrollSysError::validation(
            "Please select both year level and semester",
        ));
    };
    let student_id = ctx.student_id();

    let approved_this_year = ctx.approved_this_year(storage).await?;
    let default = default_term(&approved_this_year);

    if let Some(message) = year_level_violation(storage, ctx, year_level, default).await? {
        return Err(EnrollSysError::validation(message));
    }

    let regularity = ctx.regularity(storage, &approved_this_year).await?;
    let is_regular = req.enrollment_type == EnrollmentType::Regular && regularity.is_regular;

    let enrollment = NewEnrollment {
        student_id,
        academic_year_id: ctx.academic_year.id,
        year_level,
        semester,
        is_regular,
    };

    let submitted = if is_regular {
        storage.create_regular_enrollment(enrollment).await?
    } else {
        let codes = split_schedule_codes(&req.course_schedules);
        if codes.is_empty() {
            return Err(EnrollSysError::validation(
                "Please select at least one course schedule",
            ));
        }
        storage.create_irregular_enrollment(enrollment, codes).await?
    };

    info!(
        "Student {} submitted {} enrollment {} for {} ({})",
        student_id,
        if is_regular { "regular" } else { "irregular" },
        submitted.enrollment.id,
        Term::new(year_level, semester),
        ctx.academic_year.label
    );

    Ok(submitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selections(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_comma_joined_codes() {
        let codes = split_schedule_codes(&selections(&["AB123,CD456", "EF789"]));
        assert_eq!(codes, vec!["AB123", "CD456", "EF789"]);
    }

    #[test]
    fn test_split_trims_and_skips_empty() {
        let codes = split_schedule_codes(&selections(&[" AB123 , ,CD456,", ""]));
        assert_eq!(codes, vec!["AB123", "CD456"]);
    }

    #[test]
    fn test_split_deduplicates() {
        let codes = split_schedule_codes(&selections(&["AB123,CD456", "AB123"]));
        assert_eq!(codes, vec!["AB123", "CD456"]);
    }
}
