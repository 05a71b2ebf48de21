use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::StudentScheduleQuery,
        responses::ScheduleEnrollment,
    },
};
use crate::services::{error_response, require_principal};
use crate::storage::Storage;

fn matches_filter(enrollment: &Enrollment, query: &StudentScheduleQuery) -> bool {
    enrollment.status == EnrollmentStatus::Approved
        && query.year_level.is_none_or(|y| y == enrollment.year_level)
        && query.semester.is_none_or(|s| s == enrollment.semester)
}

/// 已通过的选课记录及其明细
pub async fn load_schedule(
    storage: &dyn Storage,
    student_id: i64,
    query: &StudentScheduleQuery,
) -> Result<Vec<ScheduleEnrollment>> {
    let labels: HashMap<i64, String> = storage
        .list_academic_years()
        .await?
        .into_iter()
        .map(|y| (y.id, y.label))
        .collect();

    let mut result = Vec::new();
    for enrollment in storage.list_student_enrollments(student_id).await? {
        if !matches_filter(&enrollment, query) {
            continue;
        }
        let details = storage.list_enroll_detail_views(enrollment.id).await?;
        result.push(ScheduleEnrollment {
            academic_year: labels
                .get(&enrollment.academic_year_id)
                .cloned()
                .unwrap_or_default(),
            enrollment,
            details,
        });
    }
    Ok(result)
}

pub async fn list_my_schedule(
    service: &EnrollmentService,
    query: StudentScheduleQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, ctx) = match service.get_context(request).await {
        Ok(resolved) => resolved,
        Err(response) => return Ok(response),
    };

    match load_schedule(storage.as_ref(), ctx.student_id(), &query).await {
        Ok(schedule) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            schedule,
            "Schedule retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve schedule")),
    }
}

pub async fn list_my_enrollments(
    service: &EnrollmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(request) {
        Ok(principal) => principal,
        Err(response) => return Ok(response),
    };
    let Some(student_id) = principal.student_id() else {
        return Ok(error_response(
            crate::errors::EnrollSysError::authorization("Only students have enrollments"),
            "Failed to retrieve enrollments",
        ));
    };
    let storage = service.get_storage(request);

    match storage.list_student_enrollments(student_id).await {
        Ok(enrollments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollments,
            "Enrollments retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve enrollments")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::entities::{Semester, YearLevel};

    fn enrollment(status: EnrollmentStatus, semester: Semester) -> Enrollment {
        Enrollment {
            id: 1,
            student_id: 1,
            section_id: Some(1),
            academic_year_id: 1,
            year_level: YearLevel::First,
            semester,
            status,
            is_regular: true,
            enrolled_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_schedule_filter() {
        let all = StudentScheduleQuery::default();
        assert!(matches_filter(
            &enrollment(EnrollmentStatus::Approved, Semester::First),
            &all
        ));
        assert!(!matches_filter(
            &enrollment(EnrollmentStatus::Pending, Semester::First),
            &all
        ));

        let second = StudentScheduleQuery {
            year_level: Some(YearLevel::First),
            semester: Some(Semester::Second),
        };
        assert!(!matches_filter(
            &enrollment(EnrollmentStatus::Approved, Semester::First),
            &second
        ));
        assert!(matches_filter(
            &enrollment(EnrollmentStatus::Approved, Semester::Second),
            &second
        ));
    }
}
