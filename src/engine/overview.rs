//! 学生选课概览

use tracing::debug;

use super::EnrollmentContext;
use super::available_courses::{CourseHistory, resolve_available};
use super::progression::default_term;
use super::regularity::Regularity;
use super::submission::year_level_violation;
use crate::errors::Result;
use crate::models::catalog::responses::{CourseBrief, CourseListItem};
use crate::models::enrollments::{
    entities::EnrollmentStatus, requests::OverviewQuery, responses::EnrollmentOverview,
};
use crate::storage::{Storage, term_query};

pub async fn build_overview(
    storage: &dyn Storage,
    ctx: &EnrollmentContext,
    query: &OverviewQuery,
) -> Result<EnrollmentOverview> {
    let student_id = ctx.student_id();
    let academic_year_id = ctx.academic_year.id;

    let is_first_time = !storage.has_any_enrollment(student_id).await?;
    let approved_this_year = ctx.approved_this_year(storage).await?;
    let default = default_term(&approved_this_year);

    let mut approved_enrollment = storage
        .find_term_enrollment(
            student_id,
            academic_year_id,
            default,
            EnrollmentStatus::Approved,
        )
        .await?;
    let pending_enrollment = match approved_enrollment {
        Some(_) => None,
        None => {
            storage
                .find_term_enrollment(
                    student_id,
                    academic_year_id,
                    default,
                    EnrollmentStatus::Pending,
                )
                .await?
        }
    };
    if query.new_enrollment && pending_enrollment.is_none() {
        approved_enrollment = None;
    }

    let validation_error = match query.year_level {
        Some(selected) if selected != default.year_level => {
            year_level_violation(storage, ctx, selected, default).await?
        }
        _ => None,
    };

    let regularity = if is_first_time {
        Regularity::regular()
    } else {
        ctx.regularity(storage, &approved_this_year).await?
    };

    let failed_courses = storage
        .list_courses_by_codes(&regularity.failed_courses)
        .await?
        .iter()
        .map(CourseBrief::from)
        .collect();

    let available_courses = if !regularity.is_regular || (is_first_time && query.force_irregular)
    {
        let candidates = storage
            .list_courses(term_query(default.year_level, default.semester))
            .await?;
        let history = CourseHistory::from_records(&storage.list_student_records(student_id).await?);
        resolve_available(candidates, default, is_first_time, &history)
            .into_iter()
            .map(CourseListItem::from)
            .collect()
    } else {
        Vec::new()
    };

    debug!(
        "Overview for student {}: default {}, first_time={}, regular={}",
        student_id, default, is_first_time, regularity.is_regular
    );

    Ok(EnrollmentOverview {
        academic_year: ctx.academic_year.clone(),
        default_term: default,
        is_first_time,
        is_regular: regularity.is_regular,
        failed_courses,
        available_courses,
        pending_enrollment,
        approved_enrollment,
        validation_error,
        sections: storage.list_sections(None).await?,
    })
}
