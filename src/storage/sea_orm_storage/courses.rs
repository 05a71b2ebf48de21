//! 课程存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::course_prerequisites::{
    ActiveModel as PrerequisiteActiveModel, Column as PrerequisiteColumn,
    Entity as CoursePrerequisites,
};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses, Model};
use crate::errors::{EnrollSysError, Result};
use crate::models::catalog::{
    entities::Course,
    requests::{CreateCourseRequest, TermQuery},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

/// 批量加载先修课程代码，按课程代码分组
pub(super) async fn load_prerequisites<C: ConnectionTrait>(
    conn: &C,
    codes: &[String],
) -> Result<HashMap<String, Vec<String>>> {
    if codes.is_empty() {
        return Ok(HashMap::new());
    }

    let edges = CoursePrerequisites::find()
        .filter(PrerequisiteColumn::CourseCode.is_in(codes.iter().cloned()))
        .order_by_asc(PrerequisiteColumn::PrerequisiteCode)
        .all(conn)
        .await
        .map_err(|e| EnrollSysError::database_operation(format!("查询先修课程失败: {e}")))?;

    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for edge in edges {
        grouped
            .entry(edge.course_code)
            .or_default()
            .push(edge.prerequisite_code);
    }
    Ok(grouped)
}

/// 将课程模型与先修关系组装为业务模型
pub(super) async fn attach_prerequisites<C: ConnectionTrait>(
    conn: &C,
    models: Vec<Model>,
) -> Result<Vec<Course>> {
    let codes: Vec<String> = models.iter().map(|m| m.code.clone()).collect();
    let mut prerequisites = load_prerequisites(conn, &codes).await?;

    Ok(models
        .into_iter()
        .map(|m| {
            let prereqs = prerequisites.remove(&m.code).unwrap_or_default();
            m.into_course(prereqs)
        })
        .collect())
}

impl SeaOrmStorage {
    /// 创建课程及其先修关系
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("开启事务失败: {e}")))?;

        let mut prerequisites = req.prerequisites.clone();
        prerequisites.sort();
        prerequisites.dedup();

        if !prerequisites.is_empty() {
            let known = Courses::find()
                .filter(Column::Code.is_in(prerequisites.iter().cloned()))
                .all(&txn)
                .await
                .map_err(|e| EnrollSysError::database_operation(format!("查询课程失败: {e}")))?;
            if let Some(missing) = prerequisites
                .iter()
                .find(|code| *code != &req.code && !known.iter().any(|m| &m.code == *code))
            {
                return Err(EnrollSysError::validation(format!(
                    "Unknown prerequisite course: {missing}"
                )));
            }
        }

        let model = ActiveModel {
            code: Set(req.code.clone()),
            professor_id: Set(req.professor_id),
            program_id: Set(req.program_id),
            year_level: Set(req.year_level.to_string()),
            semester: Set(req.semester.to_string()),
            name: Set(req.name),
            units: Set(req.units),
            lec_hours: Set(req.lec_hours),
            lab_hours: Set(req.lab_hours),
            remarks: Set(req.remarks),
        }
        .insert(&txn)
        .await
        .map_err(|e| EnrollSysError::database_operation(format!("创建课程失败: {e}")))?;

        if !prerequisites.is_empty() {
            let edges = prerequisites
                .iter()
                .map(|code| PrerequisiteActiveModel {
                    course_code: Set(req.code.clone()),
                    prerequisite_code: Set(code.clone()),
                });
            CoursePrerequisites::insert_many(edges)
                .exec(&txn)
                .await
                .map_err(|e| {
                    EnrollSysError::database_operation(format!("创建先修关系失败: {e}"))
                })?;
        }

        txn.commit()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(model.into_course(prerequisites))
    }

    /// 通过代码获取课程
    pub async fn get_course_impl(&self, code: &str) -> Result<Option<Course>> {
        let result = Courses::find_by_id(code.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询课程失败: {e}")))?;

        match result {
            Some(model) => Ok(attach_prerequisites(&self.db, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 按年级/学期列出课程
    pub async fn list_courses_impl(&self, query: TermQuery) -> Result<Vec<Course>> {
        let mut select = Courses::find();

        if let Some(year_level) = query.year_level {
            select = select.filter(Column::YearLevel.eq(year_level.to_string()));
        }
        if let Some(semester) = query.semester {
            select = select.filter(Column::Semester.eq(semester.to_string()));
        }

        let models = select
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询课程列表失败: {e}")))?;

        attach_prerequisites(&self.db, models).await
    }

    /// 按代码批量获取课程
    pub async fn list_courses_by_codes_impl(&self, codes: &[String]) -> Result<Vec<Course>> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let models = Courses::find()
            .filter(Column::Code.is_in(codes.iter().cloned()))
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询课程失败: {e}")))?;

        attach_prerequisites(&self.db, models).await
    }
}
