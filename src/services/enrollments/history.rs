use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::{
    ApiResponse,
    academic::responses::{HistoryEntry, HistoryGroup},
};
use crate::services::error_response;

/// 按 (学年, 学期) 分组，输入需已按学年、学期排序
pub fn group_history(entries: Vec<HistoryEntry>) -> Vec<HistoryGroup> {
    let mut groups: Vec<HistoryGroup> = Vec::new();

    for entry in entries {
        match groups.last_mut() {
            Some(group)
                if group.academic_year == entry.academic_year
                    && group.semester == entry.semester =>
            {
                group.records.push(entry);
            }
            _ => groups.push(HistoryGroup {
                academic_year: entry.academic_year.clone(),
                semester: entry.semester,
                year_level: entry.year_level,
                records: vec![entry],
            }),
        }
    }

    groups
}

pub async fn list_my_history(
    service: &EnrollmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, ctx) = match service.get_context(request).await {
        Ok(resolved) => resolved,
        Err(response) => return Ok(response),
    };

    match storage.list_history_entries(ctx.student_id()).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            group_history(entries),
            "Academic history retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e, "Failed to retrieve academic history")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::academic::entities::{AcademicRecord, Remark};
    use crate::models::catalog::entities::{Semester, YearLevel};

    fn entry(year: &str, semester: Semester, code: &str) -> HistoryEntry {
        let now = chrono::Utc::now();
        HistoryEntry {
            record: AcademicRecord {
                id: 1,
                course_code: code.to_string(),
                enrollment_id: 1,
                student_id: 1,
                remark: Some(Remark::Passed),
                created_at: now,
                updated_at: now,
            },
            course_name: code.to_string(),
            units: 3,
            academic_year: year.to_string(),
            year_level: YearLevel::First,
            semester,
        }
    }

    #[test]
    fn test_group_history() {
        let groups = group_history(vec![
            entry("2023-2024", Semester::First, "IT101"),
            entry("2023-2024", Semester::First, "IT102"),
            entry("2023-2024", Semester::Second, "IT103"),
            entry("2024-2025", Semester::First, "IT201"),
        ]);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].records.len(), 2);
        assert_eq!(groups[1].semester, Semester::Second);
        assert_eq!(groups[2].academic_year, "2024-2025");
    }

    #[test]
    fn test_group_history_empty() {
        assert!(group_history(Vec::new()).is_empty());
    }
}
