//! 班级存储操作与容量统计

use std::collections::HashSet;

use super::SeaOrmStorage;
use crate::entity::academic_years::{Column as AcademicYearColumn, Entity as AcademicYears};
use crate::entity::enroll_details::{Column as DetailColumn, Entity as EnrollDetails};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::schedules::{Column as ScheduleColumn, Entity as Schedules};
use crate::entity::sections::{ActiveModel, Column, Entity as Sections};
use crate::errors::{EnrollSysError, Result};
use crate::models::catalog::{
    entities::{Section, Semester, YearLevel},
    requests::{CreateSectionRequest, SectionCapacityQuery},
    responses::SectionCapacity,
};
use crate::models::enrollments::entities::EnrollmentStatus;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

/// 统计某班级在 (学年, 学期) 内处于给定状态的不同学生数
///
/// 学生经由选课明细 -> 课表时段 -> 班级 归属到班级。
pub(super) async fn count_section_students<C: ConnectionTrait>(
    conn: &C,
    section_id: i64,
    academic_year_id: i64,
    semester: Semester,
    statuses: &[EnrollmentStatus],
) -> Result<i64> {
    let mis_codes: Vec<String> = Schedules::find()
        .select_only()
        .column(ScheduleColumn::MisCode)
        .filter(ScheduleColumn::SectionId.eq(section_id))
        .into_tuple()
        .all(conn)
        .await
        .map_err(|e| EnrollSysError::database_operation(format!("查询班级课表失败: {e}")))?;
    if mis_codes.is_empty() {
        return Ok(0);
    }

    let enrollment_ids: Vec<i64> = EnrollDetails::find()
        .select_only()
        .column(DetailColumn::EnrollmentId)
        .filter(DetailColumn::MisCode.is_in(mis_codes))
        .distinct()
        .into_tuple()
        .all(conn)
        .await
        .map_err(|e| EnrollSysError::database_operation(format!("查询选课明细失败: {e}")))?;
    if enrollment_ids.is_empty() {
        return Ok(0);
    }

    let student_ids: Vec<i64> = Enrollments::find()
        .select_only()
        .column(EnrollmentColumn::StudentId)
        .filter(EnrollmentColumn::Id.is_in(enrollment_ids))
        .filter(EnrollmentColumn::AcademicYearId.eq(academic_year_id))
        .filter(EnrollmentColumn::Semester.eq(semester.to_string()))
        .filter(EnrollmentColumn::Status.is_in(statuses.iter().map(|s| s.to_string())))
        .into_tuple()
        .all(conn)
        .await
        .map_err(|e| EnrollSysError::database_operation(format!("查询选课记录失败: {e}")))?;

    Ok(student_ids.into_iter().collect::<HashSet<_>>().len() as i64)
}

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_section_impl(&self, req: CreateSectionRequest) -> Result<Section> {
        let model = ActiveModel {
            name: Set(req.name),
            capacity: Set(req.capacity),
            program_id: Set(req.program_id),
            year_level: Set(req.year_level.to_string()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_section())
    }

    /// 通过 ID 获取班级
    pub async fn get_section_impl(&self, id: i64) -> Result<Option<Section>> {
        let result = Sections::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_section()))
    }

    /// 列出班级（按 ID 排序，即分配顺序）
    pub async fn list_sections_impl(&self, year_level: Option<YearLevel>) -> Result<Vec<Section>> {
        let mut select = Sections::find();
        if let Some(year_level) = year_level {
            select = select.filter(Column::YearLevel.eq(year_level.to_string()));
        }

        let sections = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(sections.into_iter().map(|m| m.into_section()).collect())
    }

    /// 班级容量读模型：每个班级每个学期一行
    ///
    /// 未指定学年时使用当前学年，没有学年时计数均为 0。
    pub async fn section_capacities_impl(
        &self,
        query: SectionCapacityQuery,
    ) -> Result<Vec<SectionCapacity>> {
        let academic_year_id = match query.academic_year_id {
            Some(id) => Some(id),
            None => AcademicYears::find()
                .order_by_desc(AcademicYearColumn::Id)
                .one(&self.db)
                .await
                .map_err(|e| EnrollSysError::database_operation(format!("查询学年失败: {e}")))?
                .map(|m| m.id),
        };

        let sections = self.list_sections_impl(query.year_level).await?;
        let mut rows = Vec::with_capacity(sections.len() * Semester::ALL.len());

        for section in sections {
            for semester in Semester::ALL {
                let (enrolled, pending) = match academic_year_id {
                    Some(year_id) => (
                        count_section_students(
                            &self.db,
                            section.id,
                            year_id,
                            *semester,
                            &[EnrollmentStatus::Approved],
                        )
                        .await?,
                        count_section_students(
                            &self.db,
                            section.id,
                            year_id,
                            *semester,
                            &[EnrollmentStatus::Pending],
                        )
                        .await?,
                    ),
                    None => (0, 0),
                };

                rows.push(SectionCapacity {
                    section_id: section.id,
                    section_name: section.name.clone(),
                    year_level: section.year_level,
                    semester: *semester,
                    capacity: section.capacity,
                    enrolled,
                    pending,
                    available: (i64::from(section.capacity) - enrolled - pending).max(0),
                });
            }
        }

        Ok(rows)
    }
}
