//! 基于内存 SQLite 的选课流程测试

use chrono::{NaiveDate, NaiveTime};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};

use super::*;
use crate::models::academic::entities::Remark;
use crate::models::catalog::entities::{Semester, Term, Weekday, YearLevel};
use crate::models::catalog::requests::{
    CreateCourseRequest, CreateScheduleRequest, CreateSectionRequest,
};
use crate::models::enrollments::entities::EnrollmentType;
use crate::models::enrollments::requests::{OverviewQuery, RemarkEntry, SubmitEnrollmentRequest};
use crate::models::users::entities::{Gender, Identity};
use crate::models::users::requests::{CreateAdminRequest, NewStudent};
use crate::storage::sea_orm_storage::SeaOrmStorage;
use crate::storage::StorageSettings;

async fn memory_storage() -> SeaOrmStorage {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    SeaOrmStorage::with_connection(db, StorageSettings::default())
}

fn time(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

async fn add_course(
    storage: &SeaOrmStorage,
    code: &str,
    semester: Semester,
    prerequisites: &[&str],
) {
    storage
        .create_course(CreateCourseRequest {
            code: code.to_string(),
            name: format!("Course {code}"),
            year_level: YearLevel::First,
            semester,
            units: 3,
            lec_hours: 2,
            lab_hours: 1,
            program_id: None,
            professor_id: None,
            remarks: None,
            prerequisites: prerequisites.iter().map(|s| s.to_string()).collect(),
        })
        .await
        .unwrap();
}

async fn add_schedule(
    storage: &SeaOrmStorage,
    section_id: i64,
    course_code: &str,
    day: Weekday,
    start: u32,
) -> String {
    storage
        .create_schedule(CreateScheduleRequest {
            section_id,
            course_code: course_code.to_string(),
            day,
            start_time: time(start),
            end_time: time(start + 2),
        })
        .await
        .unwrap()
        .mis_code
}

async fn add_student(storage: &SeaOrmStorage, first_name: &str) -> Student {
    storage
        .create_student(NewStudent {
            program_id: None,
            first_name: first_name.to_string(),
            last_name: "Cruz".to_string(),
            middle_name: None,
            gender: Gender::Female,
            contact_number: "09171234567".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2005, 3, 14).unwrap(),
            address: "12 Rizal St".to_string(),
            city_address: "Quezon City".to_string(),
            email: format!("{}@example.com", first_name.to_lowercase()),
        })
        .await
        .unwrap()
}

/// 一年级课程：第一学期 IT101、IT102，第二学期 IT103（先修 IT101）、IT104。
/// 一年级班级 1A，课表覆盖两个学期。
struct Fixture {
    storage: SeaOrmStorage,
    section_id: i64,
    first_semester_codes: Vec<String>,
}

async fn fixture(capacity: i32) -> Fixture {
    let storage = memory_storage().await;
    storage.create_academic_year("2024-2025").await.unwrap();

    add_course(&storage, "IT101", Semester::First, &[]).await;
    add_course(&storage, "IT102", Semester::First, &[]).await;
    add_course(&storage, "IT103", Semester::Second, &["IT101"]).await;
    add_course(&storage, "IT104", Semester::Second, &[]).await;

    let section_id = add_section(&storage, "1A", capacity).await;

    let first_semester_codes = vec![
        add_schedule(&storage, section_id, "IT101", Weekday::Monday, 8).await,
        add_schedule(&storage, section_id, "IT102", Weekday::Tuesday, 10).await,
    ];
    add_schedule(&storage, section_id, "IT103", Weekday::Wednesday, 8).await;
    add_schedule(&storage, section_id, "IT104", Weekday::Thursday, 13).await;

    Fixture {
        storage,
        section_id,
        first_semester_codes,
    }
}

async fn add_section(storage: &SeaOrmStorage, name: &str, capacity: i32) -> i64 {
    storage
        .create_section(CreateSectionRequest {
            name: name.to_string(),
            capacity,
            program_id: None,
            year_level: YearLevel::First,
        })
        .await
        .unwrap()
        .id
}

async fn context(storage: &SeaOrmStorage, student: &Student) -> EnrollmentContext {
    EnrollmentContext::resolve(storage, &Principal::from_student(student))
        .await
        .unwrap()
}

fn regular_request(year_level: YearLevel, semester: Semester) -> SubmitEnrollmentRequest {
    SubmitEnrollmentRequest {
        enrollment_type: EnrollmentType::Regular,
        year_level: Some(year_level),
        semester: Some(semester),
        course_schedules: Vec::new(),
    }
}

fn remark(course_code: &str, remark: Remark) -> RemarkEntry {
    RemarkEntry {
        course_code: course_code.to_string(),
        remark,
    }
}

#[tokio::test]
async fn test_regular_enrollment_binds_section_semester_schedules() {
    let f = fixture(30).await;
    let student = add_student(&f.storage, "Ana").await;
    let ctx = context(&f.storage, &student).await;

    let submitted = submit_enrollment(
        &f.storage,
        &ctx,
        regular_request(YearLevel::First, Semester::First),
    )
    .await
    .unwrap();

    assert_eq!(submitted.enrollment.status, EnrollmentStatus::Pending);
    assert_eq!(submitted.enrollment.section_id, Some(f.section_id));
    assert!(submitted.enrollment.is_regular);

    let mut bound: Vec<String> = submitted.details.iter().map(|d| d.mis_code.clone()).collect();
    bound.sort();
    let mut expected = f.first_semester_codes.clone();
    expected.sort();
    assert_eq!(bound, expected);
}

#[tokio::test]
async fn test_full_section_reports_capacity_exhausted() {
    let f = fixture(1).await;
    let first = add_student(&f.storage, "Ana").await;
    let second = add_student(&f.storage, "Ben").await;

    let ctx = context(&f.storage, &first).await;
    submit_enrollment(&f.storage, &ctx, regular_request(YearLevel::First, Semester::First))
        .await
        .unwrap();

    let ctx = context(&f.storage, &second).await;
    let err = submit_enrollment(&f.storage, &ctx, regular_request(YearLevel::First, Semester::First))
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollSysError::CapacityExhausted(_)));
    assert!(!f.storage.has_any_enrollment(second.id).await.unwrap());
}

#[tokio::test]
async fn test_irregular_enrollment_skips_unknown_codes() {
    let f = fixture(30).await;
    let student = add_student(&f.storage, "Ana").await;
    let ctx = context(&f.storage, &student).await;

    let joined = f.first_semester_codes.join(",");
    let submitted = submit_enrollment(
        &f.storage,
        &ctx,
        SubmitEnrollmentRequest {
            enrollment_type: EnrollmentType::Irregular,
            year_level: Some(YearLevel::First),
            semester: Some(Semester::First),
            course_schedules: vec![joined, "ZZ9999".to_string()],
        },
    )
    .await
    .unwrap();

    assert!(!submitted.enrollment.is_regular);
    assert_eq!(submitted.enrollment.section_id, None);
    assert_eq!(submitted.details.len(), 2);
}

#[tokio::test]
async fn test_full_section_falls_through_to_next_section() {
    let f = fixture(1).await;
    let second_section = add_section(&f.storage, "1B", 1).await;
    add_schedule(&f.storage, second_section, "IT101", Weekday::Friday, 8).await;
    add_schedule(&f.storage, second_section, "IT102", Weekday::Friday, 13).await;

    let mut assigned = Vec::new();
    for name in ["Ana", "Ben"] {
        let student = add_student(&f.storage, name).await;
        let ctx = context(&f.storage, &student).await;
        let submitted =
            submit_enrollment(&f.storage, &ctx, regular_request(YearLevel::First, Semester::First))
                .await
                .unwrap();
        assigned.push(submitted.enrollment.section_id);
    }
    assert_eq!(assigned, vec![Some(f.section_id), Some(second_section)]);

    let third = add_student(&f.storage, "Cora").await;
    let ctx = context(&f.storage, &third).await;
    let err = submit_enrollment(&f.storage, &ctx, regular_request(YearLevel::First, Semester::First))
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollSysError::CapacityExhausted(_)));
    assert!(!f.storage.has_any_enrollment(third.id).await.unwrap());
}

#[tokio::test]
async fn test_section_without_semester_schedules_rolls_back() {
    let storage = memory_storage().await;
    storage.create_academic_year("2024-2025").await.unwrap();
    add_course(&storage, "IT101", Semester::First, &[]).await;
    add_course(&storage, "IT104", Semester::Second, &[]).await;

    let section_id = add_section(&storage, "1A", 30).await;
    add_schedule(&storage, section_id, "IT104", Weekday::Thursday, 13).await;

    let student = add_student(&storage, "Ana").await;
    let ctx = context(&storage, &student).await;
    let err = submit_enrollment(&storage, &ctx, regular_request(YearLevel::First, Semester::First))
        .await
        .unwrap_err();

    assert!(matches!(err, EnrollSysError::Validation(_)));
    assert!(!storage.has_any_enrollment(student.id).await.unwrap());
}

#[tokio::test]
async fn test_irregular_enrollment_binds_every_resolved_code() {
    let f = fixture(30).await;
    let extra = add_schedule(&f.storage, f.section_id, "IT101", Weekday::Friday, 8).await;
    let student = add_student(&f.storage, "Ana").await;
    let ctx = context(&f.storage, &student).await;

    let submitted = submit_enrollment(
        &f.storage,
        &ctx,
        SubmitEnrollmentRequest {
            enrollment_type: EnrollmentType::Irregular,
            year_level: Some(YearLevel::First),
            semester: Some(Semester::First),
            course_schedules: vec![f.first_semester_codes.join(","), extra],
        },
    )
    .await
    .unwrap();

    assert_eq!(submitted.details.len(), 3);
    assert_eq!(submitted.enrollment.section_id, None);
}

#[tokio::test]
async fn test_irregular_enrollment_with_only_unknown_codes_writes_nothing() {
    let f = fixture(30).await;
    let student = add_student(&f.storage, "Ana").await;
    let ctx = context(&f.storage, &student).await;

    let err = submit_enrollment(
        &f.storage,
        &ctx,
        SubmitEnrollmentRequest {
            enrollment_type: EnrollmentType::Irregular,
            year_level: Some(YearLevel::First),
            semester: Some(Semester::First),
            course_schedules: vec!["ZZ9999,YY8888".to_string()],
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, EnrollSysError::Validation(_)));
    assert!(!f.storage.has_any_enrollment(student.id).await.unwrap());
}

#[tokio::test]
async fn test_missing_term_is_rejected() {
    let f = fixture(30).await;
    let student = add_student(&f.storage, "Ana").await;
    let ctx = context(&f.storage, &student).await;

    let mut req = regular_request(YearLevel::First, Semester::First);
    req.semester = None;
    let err = submit_enrollment(&f.storage, &ctx, req).await.unwrap_err();
    assert!(matches!(err, EnrollSysError::Validation(_)));
}

#[tokio::test]
async fn test_year_level_override_requires_previous_year() {
    let f = fixture(30).await;
    let student = add_student(&f.storage, "Ana").await;
    let ctx = context(&f.storage, &student).await;

    let err = submit_enrollment(
        &f.storage,
        &ctx,
        regular_request(YearLevel::Second, Semester::First),
    )
    .await
    .unwrap_err();

    match err {
        EnrollSysError::Validation(message) => assert!(message.contains("First Year")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_approval_is_idempotent_and_advances_default_term() {
    let f = fixture(30).await;
    let student = add_student(&f.storage, "Ana").await;
    let ctx = context(&f.storage, &student).await;

    let submitted = submit_enrollment(
        &f.storage,
        &ctx,
        regular_request(YearLevel::First, Semester::First),
    )
    .await
    .unwrap();
    let id = submitted.enrollment.id;

    approve_enrollment(&f.storage, id).await.unwrap();
    let again = approve_enrollment(&f.storage, id).await.unwrap();
    assert_eq!(again.status, EnrollmentStatus::Approved);

    let approved = ctx.approved_this_year(&f.storage).await.unwrap();
    assert_eq!(
        default_term(&approved),
        Term::new(YearLevel::First, Semester::Second)
    );

    let err = approve_enrollment(&f.storage, id + 100).await.unwrap_err();
    assert!(matches!(err, EnrollSysError::NotFound(_)));
}

#[tokio::test]
async fn test_rejected_enrollment_frees_the_seat() {
    let f = fixture(1).await;
    let first = add_student(&f.storage, "Ana").await;
    let second = add_student(&f.storage, "Ben").await;

    let ctx = context(&f.storage, &first).await;
    let submitted =
        submit_enrollment(&f.storage, &ctx, regular_request(YearLevel::First, Semester::First))
            .await
            .unwrap();
    reject_enrollment(&f.storage, submitted.enrollment.id)
        .await
        .unwrap();

    let ctx = context(&f.storage, &second).await;
    let submitted =
        submit_enrollment(&f.storage, &ctx, regular_request(YearLevel::First, Semester::First))
            .await
            .unwrap();
    assert_eq!(submitted.enrollment.section_id, Some(f.section_id));
}

#[tokio::test]
async fn test_remarks_upsert_and_reject_unbound_courses() {
    let f = fixture(30).await;
    let student = add_student(&f.storage, "Ana").await;
    let ctx = context(&f.storage, &student).await;

    let id = submit_enrollment(
        &f.storage,
        &ctx,
        regular_request(YearLevel::First, Semester::First),
    )
    .await
    .unwrap()
    .enrollment
    .id;

    let records = record_remarks(
        &f.storage,
        id,
        vec![remark("IT101", Remark::Passed), remark("IT102", Remark::Failed)],
    )
    .await
    .unwrap();
    assert_eq!(records.len(), 2);

    let records = record_remarks(&f.storage, id, vec![remark("IT102", Remark::Passed)])
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.remark == Some(Remark::Passed)));

    let err = record_remarks(&f.storage, id, vec![remark("IT103", Remark::Passed)])
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollSysError::Validation(_)));

    let err = record_remarks(&f.storage, id, Vec::new()).await.unwrap_err();
    assert!(matches!(err, EnrollSysError::Validation(_)));
}

#[tokio::test]
async fn test_overview_after_failed_course() {
    let f = fixture(30).await;
    let student = add_student(&f.storage, "Ana").await;
    let ctx = context(&f.storage, &student).await;

    let overview = build_overview(&f.storage, &ctx, &OverviewQuery::default())
        .await
        .unwrap();
    assert!(overview.is_first_time);
    assert!(overview.is_regular);
    assert_eq!(overview.default_term, Term::first());

    let id = submit_enrollment(
        &f.storage,
        &ctx,
        regular_request(YearLevel::First, Semester::First),
    )
    .await
    .unwrap()
    .enrollment
    .id;
    approve_enrollment(&f.storage, id).await.unwrap();
    record_remarks(
        &f.storage,
        id,
        vec![remark("IT101", Remark::Failed), remark("IT102", Remark::Passed)],
    )
    .await
    .unwrap();

    let overview = build_overview(&f.storage, &ctx, &OverviewQuery::default())
        .await
        .unwrap();
    assert!(!overview.is_first_time);
    assert!(!overview.is_regular);
    assert_eq!(
        overview.default_term,
        Term::new(YearLevel::First, Semester::Second)
    );
    let failed: Vec<&str> = overview
        .failed_courses
        .iter()
        .map(|c| c.code.as_str())
        .collect();
    assert_eq!(failed, vec!["IT101"]);

    // IT103 的先修 IT101 未通过
    let available: Vec<&str> = overview
        .available_courses
        .iter()
        .map(|c| c.course.code.as_str())
        .collect();
    assert_eq!(available, vec!["IT104"]);
}

#[tokio::test]
async fn test_failed_student_choosing_regular_is_treated_as_irregular() {
    let f = fixture(30).await;
    let student = add_student(&f.storage, "Ana").await;
    let ctx = context(&f.storage, &student).await;

    let id = submit_enrollment(
        &f.storage,
        &ctx,
        regular_request(YearLevel::First, Semester::First),
    )
    .await
    .unwrap()
    .enrollment
    .id;
    approve_enrollment(&f.storage, id).await.unwrap();
    record_remarks(&f.storage, id, vec![remark("IT101", Remark::Failed)])
        .await
        .unwrap();

    // 没有选择任何时段
    let err = submit_enrollment(
        &f.storage,
        &ctx,
        regular_request(YearLevel::First, Semester::Second),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, EnrollSysError::Validation(_)));
}

#[tokio::test]
async fn test_admin_ids_start_from_configured_value() {
    let storage = memory_storage().await;
    let request = |email: &str| CreateAdminRequest {
        first_name: "Maria".to_string(),
        last_name: "Santos".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        email: email.to_string(),
    };

    let first = storage.create_admin(request("a@example.com")).await.unwrap();
    let second = storage.create_admin(request("b@example.com")).await.unwrap();
    assert_eq!(first.id, 20001);
    assert_eq!(second.id, 20002);
    assert_eq!(storage.count_admins().await.unwrap(), 2);
}

#[tokio::test]
async fn test_login_identity_matches_id_and_birth_date() {
    let storage = memory_storage().await;
    let student = add_student(&storage, "Ana").await;
    let admin = storage
        .create_admin(CreateAdminRequest {
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            email: "maria@example.com".to_string(),
        })
        .await
        .unwrap();

    let found = storage
        .find_identity(student.id, student.date_of_birth)
        .await
        .unwrap();
    assert!(matches!(found, Some(Identity::Student(s)) if s.id == student.id));

    let found = storage
        .find_identity(admin.id, admin.date_of_birth)
        .await
        .unwrap();
    assert!(matches!(found, Some(Identity::Admin(a)) if a.id == admin.id));

    let wrong_date = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
    assert!(
        storage
            .find_identity(student.id, wrong_date)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_schedule_rows_carry_program_code() {
    let storage = memory_storage().await;
    let bsit = storage.get_program_by_code("BSIT").await.unwrap().unwrap();
    add_course(&storage, "IT101", Semester::First, &[]).await;
    let section = storage
        .create_section(CreateSectionRequest {
            name: "1A".to_string(),
            capacity: 40,
            program_id: Some(bsit.id),
            year_level: YearLevel::First,
        })
        .await
        .unwrap();
    let mis_code = add_schedule(&storage, section.id, "IT101", Weekday::Friday, 9).await;
    assert!(crate::utils::mis_code::is_valid_mis_code(&mis_code));

    let rows = storage.list_schedules_by_course("IT101").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].schedule.mis_code, mis_code);
    assert_eq!(rows[0].program_code.as_deref(), Some("BSIT"));
    assert!(rows[0].professor.is_none());
}
