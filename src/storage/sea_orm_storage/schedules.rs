//! 课表时段存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use super::courses::attach_prerequisites;
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::professors::{Column as ProfessorColumn, Entity as Professors};
use crate::entity::programs::{Column as ProgramColumn, Entity as Programs};
use crate::entity::schedules::{ActiveModel, Column, Entity as Schedules, Model};
use crate::entity::sections::{Column as SectionColumn, Entity as Sections};
use crate::errors::{EnrollSysError, Result};
use crate::models::catalog::{
    entities::Schedule,
    requests::{CreateScheduleRequest, TermQuery},
};
use crate::storage::ScheduleRow;
use crate::utils::mis_code::generate_mis_code;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr,
};
use tracing::debug;

/// 为课表时段补齐课程、班级、专业与教师信息
pub(super) async fn load_schedule_rows<C: ConnectionTrait>(
    conn: &C,
    schedules: Vec<Model>,
) -> Result<Vec<ScheduleRow>> {
    if schedules.is_empty() {
        return Ok(Vec::new());
    }

    let mut course_codes: Vec<String> = schedules.iter().map(|s| s.course_code.clone()).collect();
    course_codes.sort();
    course_codes.dedup();
    let mut section_ids: Vec<i64> = schedules.iter().map(|s| s.section_id).collect();
    section_ids.sort_unstable();
    section_ids.dedup();

    let course_models = Courses::find()
        .filter(CourseColumn::Code.is_in(course_codes))
        .all(conn)
        .await
        .map_err(|e| EnrollSysError::database_operation(format!("查询课程失败: {e}")))?;
    let courses: HashMap<String, _> = attach_prerequisites(conn, course_models)
        .await?
        .into_iter()
        .map(|c| (c.code.clone(), c))
        .collect();

    let sections: HashMap<i64, _> = Sections::find()
        .filter(SectionColumn::Id.is_in(section_ids))
        .all(conn)
        .await
        .map_err(|e| EnrollSysError::database_operation(format!("查询班级失败: {e}")))?
        .into_iter()
        .map(|m| (m.id, m.into_section()))
        .collect();

    let mut program_ids: Vec<i64> = sections
        .values()
        .filter_map(|s| s.program_id)
        .chain(courses.values().filter_map(|c| c.program_id))
        .collect();
    program_ids.sort_unstable();
    program_ids.dedup();
    let programs: HashMap<i64, String> = if program_ids.is_empty() {
        HashMap::new()
    } else {
        Programs::find()
            .filter(ProgramColumn::Id.is_in(program_ids))
            .all(conn)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询专业失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.code))
            .collect()
    };

    let mut professor_ids: Vec<i64> = courses.values().filter_map(|c| c.professor_id).collect();
    professor_ids.sort_unstable();
    professor_ids.dedup();
    let professors: HashMap<i64, _> = if professor_ids.is_empty() {
        HashMap::new()
    } else {
        Professors::find()
            .filter(ProfessorColumn::Id.is_in(professor_ids))
            .all(conn)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询教师失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.into_professor()))
            .collect()
    };

    let mut rows = Vec::with_capacity(schedules.len());
    for model in schedules {
        let (Some(course), Some(section)) = (
            courses.get(&model.course_code),
            sections.get(&model.section_id),
        ) else {
            continue;
        };

        let program_code = section
            .program_id
            .or(course.program_id)
            .and_then(|id| programs.get(&id).cloned());
        let professor = course
            .professor_id
            .and_then(|id| professors.get(&id).cloned());

        rows.push(ScheduleRow {
            course: course.clone(),
            section: section.clone(),
            program_code,
            professor,
            schedule: model.into_schedule(),
        });
    }

    Ok(rows)
}

impl SeaOrmStorage {
    /// 创建课表时段
    ///
    /// MIS 码随机生成后直接插入，主键冲突时重新生成，
    /// 超过最大尝试次数则报错。
    pub async fn create_schedule_impl(&self, req: CreateScheduleRequest) -> Result<Schedule> {
        for attempt in 1..=self.settings.mis_code_max_attempts {
            let mis_code = generate_mis_code();
            let model = ActiveModel {
                mis_code: Set(mis_code.clone()),
                section_id: Set(req.section_id),
                course_code: Set(req.course_code.clone()),
                day: Set(req.day.to_string()),
                start_time: Set(req.start_time),
                end_time: Set(req.end_time),
            };

            match model.insert(&self.db).await {
                Ok(result) => return Ok(result.into_schedule()),
                Err(e) => match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        debug!("MIS code {} already taken (attempt {})", mis_code, attempt);
                        continue;
                    }
                    Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                        return Err(EnrollSysError::validation(
                            "Section or course does not exist",
                        ));
                    }
                    _ => {
                        return Err(EnrollSysError::database_operation(format!(
                            "创建课表时段失败: {e}"
                        )));
                    }
                },
            }
        }

        Err(EnrollSysError::database_operation(format!(
            "无法生成唯一的 MIS 码（已尝试 {} 次）",
            self.settings.mis_code_max_attempts
        )))
    }

    /// 按课程列出课表时段，按班级名、星期、开始时间排序
    pub async fn list_schedules_by_course_impl(&self, course_code: &str) -> Result<Vec<ScheduleRow>> {
        let schedules = Schedules::find()
            .filter(Column::CourseCode.eq(course_code))
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询课表失败: {e}")))?;

        let mut rows = load_schedule_rows(&self.db, schedules).await?;
        rows.sort_by(|a, b| {
            a.section
                .name
                .cmp(&b.section.name)
                .then(a.schedule.day.cmp(&b.schedule.day))
                .then(a.schedule.start_time.cmp(&b.schedule.start_time))
        });
        Ok(rows)
    }

    /// 按课程年级/学期列出课表时段
    pub async fn list_schedules_impl(&self, query: TermQuery) -> Result<Vec<ScheduleRow>> {
        let mut course_select = Courses::find();
        if let Some(year_level) = query.year_level {
            course_select = course_select.filter(CourseColumn::YearLevel.eq(year_level.to_string()));
        }
        if let Some(semester) = query.semester {
            course_select = course_select.filter(CourseColumn::Semester.eq(semester.to_string()));
        }
        let course_codes: Vec<String> = course_select
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|m| m.code)
            .collect();
        if course_codes.is_empty() {
            return Ok(Vec::new());
        }

        let schedules = Schedules::find()
            .filter(Column::CourseCode.is_in(course_codes))
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询课表失败: {e}")))?;

        let mut rows = load_schedule_rows(&self.db, schedules).await?;
        rows.sort_by(|a, b| {
            a.course
                .year_level
                .cmp(&b.course.year_level)
                .then(a.course.semester.cmp(&b.course.semester))
                .then(a.course.code.cmp(&b.course.code))
                .then(a.section.name.cmp(&b.section.name))
                .then(a.schedule.day.cmp(&b.schedule.day))
                .then(a.schedule.start_time.cmp(&b.schedule.start_time))
        });
        Ok(rows)
    }
}
