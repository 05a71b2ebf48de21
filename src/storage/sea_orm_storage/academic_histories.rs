//! 学业记录存储操作

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::academic_histories::{ActiveModel, Column, Entity as AcademicHistories};
use crate::entity::academic_years::{Column as AcademicYearColumn, Entity as AcademicYears};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::enroll_details::{Column as DetailColumn, Entity as EnrollDetails};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::schedules::{Column as ScheduleColumn, Entity as Schedules};
use crate::errors::{EnrollSysError, Result};
use crate::models::{
    academic::{entities::AcademicRecord, responses::HistoryEntry},
    enrollments::{entities::Enrollment, requests::RemarkEntry},
};
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::OnConflict,
};
use tracing::info;

impl SeaOrmStorage {
    /// 学生的全部学业记录
    pub async fn list_student_records_impl(&self, student_id: i64) -> Result<Vec<AcademicRecord>> {
        let records = AcademicHistories::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::EnrollmentId)
            .order_by_asc(Column::CourseCode)
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学业记录失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_record()).collect())
    }

    /// 某次选课的学业记录
    pub async fn list_enrollment_records_impl(
        &self,
        enrollment_id: i64,
    ) -> Result<Vec<AcademicRecord>> {
        let records = AcademicHistories::find()
            .filter(Column::EnrollmentId.eq(enrollment_id))
            .order_by_asc(Column::CourseCode)
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学业记录失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_record()).collect())
    }

    /// 写入成绩备注
    ///
    /// 只接受该选课记录所绑定课表中的课程，同一 (选课记录, 课程, 学生) 重复写入时覆盖备注。
    pub async fn upsert_remarks_impl(
        &self,
        enrollment: &Enrollment,
        entries: Vec<RemarkEntry>,
    ) -> Result<Vec<AcademicRecord>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("开启事务失败: {e}")))?;

        let mis_codes: Vec<String> = EnrollDetails::find()
            .select_only()
            .column(DetailColumn::MisCode)
            .filter(DetailColumn::EnrollmentId.eq(enrollment.id))
            .into_tuple::<String>()
            .all(&txn)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询选课明细失败: {e}")))?;

        let bound: HashSet<String> = Schedules::find()
            .select_only()
            .column(ScheduleColumn::CourseCode)
            .filter(ScheduleColumn::MisCode.is_in(mis_codes))
            .into_tuple::<String>()
            .all(&txn)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询课表失败: {e}")))?
            .into_iter()
            .collect();

        if let Some(entry) = entries.iter().find(|e| !bound.contains(&e.course_code)) {
            return Err(EnrollSysError::validation(format!(
                "Course {} is not part of enrollment {}",
                entry.course_code, enrollment.id
            )));
        }

        let now = chrono::Utc::now().timestamp();
        for entry in &entries {
            let model = ActiveModel {
                course_code: Set(entry.course_code.clone()),
                enrollment_id: Set(enrollment.id),
                student_id: Set(enrollment.student_id),
                remark: Set(Some(entry.remark.to_string())),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            AcademicHistories::insert(model)
                .on_conflict(
                    OnConflict::columns([Column::EnrollmentId, Column::CourseCode, Column::StudentId])
                        .update_columns([Column::Remark, Column::UpdatedAt])
                        .to_owned(),
                )
                .exec(&txn)
                .await
                .map_err(|e| EnrollSysError::database_operation(format!("写入学业记录失败: {e}")))?;
        }

        let records = AcademicHistories::find()
            .filter(Column::EnrollmentId.eq(enrollment.id))
            .order_by_asc(Column::CourseCode)
            .all(&txn)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学业记录失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Recorded {} remarks for enrollment {}",
            entries.len(),
            enrollment.id
        );
        Ok(records.into_iter().map(|m| m.into_record()).collect())
    }

    /// 学生的完整学业记录（带课程、学年与学期）
    pub async fn list_history_entries_impl(&self, student_id: i64) -> Result<Vec<HistoryEntry>> {
        let records = AcademicHistories::find()
            .filter(Column::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学业记录失败: {e}")))?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let enrollment_ids: HashSet<i64> = records.iter().map(|r| r.enrollment_id).collect();
        let course_codes: HashSet<String> = records.iter().map(|r| r.course_code.clone()).collect();

        let enrollments: HashMap<i64, Enrollment> = Enrollments::find()
            .filter(EnrollmentColumn::Id.is_in(enrollment_ids))
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询选课记录失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.into_enrollment()))
            .collect();

        let courses: HashMap<String, (String, i32)> = Courses::find()
            .filter(CourseColumn::Code.is_in(course_codes))
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|m| (m.code, (m.name, m.units)))
            .collect();

        let year_ids: HashSet<i64> = enrollments.values().map(|e| e.academic_year_id).collect();
        let years: HashMap<i64, String> = AcademicYears::find()
            .filter(AcademicYearColumn::Id.is_in(year_ids))
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学年失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.label))
            .collect();

        let mut entries: Vec<(i64, HistoryEntry)> = records
            .into_iter()
            .filter_map(|model| {
                let enrollment = enrollments.get(&model.enrollment_id)?;
                let (course_name, units) = courses
                    .get(&model.course_code)
                    .cloned()
                    .unwrap_or_else(|| (model.course_code.clone(), 0));
                let academic_year = years
                    .get(&enrollment.academic_year_id)
                    .cloned()
                    .unwrap_or_default();
                Some((
                    enrollment.academic_year_id,
                    HistoryEntry {
                        course_name,
                        units,
                        academic_year,
                        year_level: enrollment.year_level,
                        semester: enrollment.semester,
                        record: model.into_record(),
                    },
                ))
            })
            .collect();

        entries.sort_by(|(ay_a, a), (ay_b, b)| {
            ay_a.cmp(ay_b)
                .then(a.semester.cmp(&b.semester))
                .then_with(|| a.record.course_code.cmp(&b.record.course_code))
        });

        Ok(entries.into_iter().map(|(_, entry)| entry).collect())
    }
}
