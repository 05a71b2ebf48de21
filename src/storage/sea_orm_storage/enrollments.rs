//! 选课记录存储操作
//!
//! 整班选课与按课程选课都在单个事务内完成，任何一步失败都会整体回滚。

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use super::schedules::load_schedule_rows;
use super::sections::count_section_students;
use crate::entity::academic_years::{Column as AcademicYearColumn, Entity as AcademicYears};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::enroll_details::{
    ActiveModel as DetailActiveModel, Column as DetailColumn, Entity as EnrollDetails,
};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::entity::schedules::{Column as ScheduleColumn, Entity as Schedules};
use crate::entity::sections::{Column as SectionColumn, Entity as Sections};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{EnrollSysError, Result};
use crate::models::{
    PageRequest, PaginationInfo,
    catalog::{entities::Term, responses::CourseBrief},
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::{EnrollmentListQuery, NewEnrollment},
        responses::{EnrollDetailView, EnrollmentListResponse, EnrollmentSummary, SubmittedEnrollment},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, warn};

/// 占用名额的状态
const SEAT_HOLDING: [EnrollmentStatus; 2] = [EnrollmentStatus::Pending, EnrollmentStatus::Approved];

/// 在事务内插入选课记录及其明细
async fn insert_enrollment_with_details(
    txn: &DatabaseTransaction,
    enrollment: &NewEnrollment,
    section_id: Option<i64>,
    mis_codes: &[String],
) -> Result<SubmittedEnrollment> {
    let now = chrono::Utc::now().timestamp();

    let model = ActiveModel {
        student_id: Set(enrollment.student_id),
        section_id: Set(section_id),
        academic_year_id: Set(enrollment.academic_year_id),
        year_level: Set(enrollment.year_level.to_string()),
        semester: Set(enrollment.semester.to_string()),
        status: Set(EnrollmentStatus::Pending.to_string()),
        is_regular: Set(enrollment.is_regular),
        enrolled_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await
    .map_err(|e| EnrollSysError::database_operation(format!("创建选课记录失败: {e}")))?;

    let mut details = Vec::with_capacity(mis_codes.len());
    for mis_code in mis_codes {
        let detail = DetailActiveModel {
            enrollment_id: Set(model.id),
            mis_code: Set(mis_code.clone()),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| EnrollSysError::database_operation(format!("创建选课明细失败: {e}")))?;
        details.push(detail.into_enroll_detail());
    }

    Ok(SubmittedEnrollment {
        enrollment: model.into_enrollment(),
        details,
    })
}

impl SeaOrmStorage {
    /// 学生是否有过任何选课记录
    pub async fn has_any_enrollment_impl(&self, student_id: i64) -> Result<bool> {
        let count = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(count > 0)
    }

    /// 学生全部选课记录
    pub async fn list_student_enrollments_impl(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        let enrollments = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::AcademicYearId)
            .order_by_asc(Column::Semester)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(enrollments.into_iter().map(|m| m.into_enrollment()).collect())
    }

    /// 学生在某学年内指定状态的选课记录
    pub async fn list_enrollments_in_year_impl(
        &self,
        student_id: i64,
        academic_year_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Vec<Enrollment>> {
        let enrollments = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AcademicYearId.eq(academic_year_id))
            .filter(Column::Status.eq(status.to_string()))
            .order_by_asc(Column::Semester)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(enrollments.into_iter().map(|m| m.into_enrollment()).collect())
    }

    /// 某学期坐标上指定状态的最新选课记录
    pub async fn find_term_enrollment_impl(
        &self,
        student_id: i64,
        academic_year_id: i64,
        term: Term,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AcademicYearId.eq(academic_year_id))
            .filter(Column::YearLevel.eq(term.year_level.to_string()))
            .filter(Column::Semester.eq(term.semester.to_string()))
            .filter(Column::Status.eq(status.to_string()))
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 通过 ID 获取选课记录
    pub async fn get_enrollment_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 分页列出选课记录
    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        let window = PageRequest::new(query.page, query.size);

        let mut select = Enrollments::find();
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(academic_year_id) = query.academic_year_id {
            select = select.filter(Column::AcademicYearId.eq(academic_year_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        select = select.order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, window.size);
        let total = paginator.num_items().await.map_err(|e| {
            EnrollSysError::database_operation(format!("查询选课记录总数失败: {e}"))
        })?;
        let enrollments = paginator.fetch_page(window.zero_based()).await.map_err(|e| {
            EnrollSysError::database_operation(format!("查询选课记录列表失败: {e}"))
        })?;

        let student_ids: HashSet<i64> = enrollments.iter().map(|m| m.student_id).collect();
        let year_ids: HashSet<i64> = enrollments.iter().map(|m| m.academic_year_id).collect();

        let students: HashMap<i64, String> = Students::find()
            .filter(StudentColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.into_student().full_name()))
            .collect();
        let years: HashMap<i64, String> = AcademicYears::find()
            .filter(AcademicYearColumn::Id.is_in(year_ids))
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学年失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.label))
            .collect();

        let items = enrollments
            .into_iter()
            .map(|m| {
                let student_name = students.get(&m.student_id).cloned().unwrap_or_default();
                let academic_year = years.get(&m.academic_year_id).cloned().unwrap_or_default();
                EnrollmentSummary {
                    enrollment: m.into_enrollment(),
                    student_name,
                    academic_year,
                }
            })
            .collect();

        Ok(EnrollmentListResponse {
            items,
            pagination: PaginationInfo::from_total(window, total),
        })
    }

    /// 选课明细（带课程与班级）
    pub async fn list_enroll_detail_views_impl(
        &self,
        enrollment_id: i64,
    ) -> Result<Vec<EnrollDetailView>> {
        let details = EnrollDetails::find()
            .filter(DetailColumn::EnrollmentId.eq(enrollment_id))
            .order_by_asc(DetailColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询选课明细失败: {e}")))?;
        if details.is_empty() {
            return Ok(Vec::new());
        }

        let schedules = Schedules::find()
            .filter(ScheduleColumn::MisCode.is_in(details.iter().map(|d| d.mis_code.clone())))
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询课表失败: {e}")))?;
        let rows: HashMap<String, _> = load_schedule_rows(&self.db, schedules)
            .await?
            .into_iter()
            .map(|row| (row.schedule.mis_code.clone(), row))
            .collect();

        Ok(details
            .into_iter()
            .filter_map(|detail| {
                let row = rows.get(&detail.mis_code)?;
                Some(EnrollDetailView {
                    day_time: row.schedule.day_time(),
                    schedule: row.schedule.clone(),
                    course: CourseBrief::from(&row.course),
                    section: row.section.name.clone(),
                    detail: detail.into_enroll_detail(),
                })
            })
            .collect())
    }

    /// 整班选课
    ///
    /// 按 ID 顺序检查该年级的班级，统计 (学年, 学期) 内待审核与已通过的
    /// 不同学生数，选择第一个未满的班级；非 SQLite 后端先对班级行加排他锁。
    /// 随后绑定该班级在目标学期的全部课表时段。
    pub async fn create_regular_enrollment_impl(
        &self,
        enrollment: NewEnrollment,
    ) -> Result<SubmittedEnrollment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("开启事务失败: {e}")))?;
        let lock_rows = txn.get_database_backend() != DbBackend::Sqlite;

        let candidates = Sections::find()
            .filter(SectionColumn::YearLevel.eq(enrollment.year_level.to_string()))
            .order_by_asc(SectionColumn::Id)
            .all(&txn)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询班级失败: {e}")))?;

        let mut chosen = None;
        for section in candidates {
            if lock_rows {
                Sections::find_by_id(section.id)
                    .lock_exclusive()
                    .one(&txn)
                    .await
                    .map_err(|e| {
                        EnrollSysError::database_operation(format!("锁定班级失败: {e}"))
                    })?;
            }

            let occupied = count_section_students(
                &txn,
                section.id,
                enrollment.academic_year_id,
                enrollment.semester,
                &SEAT_HOLDING,
            )
            .await?;
            debug!(
                "Section {} occupancy {}/{}",
                section.name, occupied, section.capacity
            );

            if occupied < i64::from(section.capacity) {
                chosen = Some(section);
                break;
            }
        }

        let Some(section) = chosen else {
            return Err(EnrollSysError::capacity_exhausted(
                "No available sections with capacity for this year level",
            ));
        };

        let semester_courses: HashSet<String> = Courses::find()
            .select_only()
            .column(CourseColumn::Code)
            .filter(CourseColumn::Semester.eq(enrollment.semester.to_string()))
            .into_tuple::<String>()
            .all(&txn)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .collect();

        let mis_codes: Vec<String> = Schedules::find()
            .filter(ScheduleColumn::SectionId.eq(section.id))
            .order_by_asc(ScheduleColumn::CourseCode)
            .order_by_asc(ScheduleColumn::MisCode)
            .all(&txn)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询班级课表失败: {e}")))?
            .into_iter()
            .filter(|s| semester_courses.contains(&s.course_code))
            .map(|s| s.mis_code)
            .collect();

        if mis_codes.is_empty() {
            return Err(EnrollSysError::validation(
                "No schedules available for this section",
            ));
        }

        let submitted =
            insert_enrollment_with_details(&txn, &enrollment, Some(section.id), &mis_codes).await?;

        txn.commit()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Regular enrollment {} created for student {} in section {} ({} schedules)",
            submitted.enrollment.id,
            enrollment.student_id,
            section.name,
            submitted.details.len()
        );
        Ok(submitted)
    }

    /// 按课程选课
    ///
    /// 逐个解析 MIS 码，不存在的码记录警告后跳过；一个都解析不到时不写入任何数据。
    pub async fn create_irregular_enrollment_impl(
        &self,
        enrollment: NewEnrollment,
        mis_codes: Vec<String>,
    ) -> Result<SubmittedEnrollment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("开启事务失败: {e}")))?;

        let known: HashSet<String> = Schedules::find()
            .select_only()
            .column(ScheduleColumn::MisCode)
            .filter(ScheduleColumn::MisCode.is_in(mis_codes.iter().cloned()))
            .into_tuple::<String>()
            .all(&txn)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询课表失败: {e}")))?
            .into_iter()
            .collect();

        let resolved: Vec<String> = mis_codes
            .into_iter()
            .filter(|code| {
                let found = known.contains(code);
                if !found {
                    warn!(
                        "Skipping unknown schedule code {} for student {}",
                        code, enrollment.student_id
                    );
                }
                found
            })
            .collect();

        if resolved.is_empty() {
            return Err(EnrollSysError::validation(
                "None of the selected course schedules could be found",
            ));
        }

        let submitted = insert_enrollment_with_details(&txn, &enrollment, None, &resolved).await?;

        txn.commit()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Irregular enrollment {} created for student {} ({} schedules)",
            submitted.enrollment.id,
            enrollment.student_id,
            submitted.details.len()
        );
        Ok(submitted)
    }

    /// 无条件写入选课状态
    pub async fn update_enrollment_status_impl(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        let existing = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询选课记录失败: {e}")))?;

        let Some(model) = existing else {
            return Ok(None);
        };

        let mut active: ActiveModel = model.into();
        active.status = Set(status.to_string());

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("更新选课状态失败: {e}")))?;

        Ok(Some(result.into_enrollment()))
    }
}
