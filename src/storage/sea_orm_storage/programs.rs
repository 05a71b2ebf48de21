//! 专业与教师存储操作

use super::SeaOrmStorage;
use crate::entity::professors::{
    ActiveModel as ProfessorActiveModel, Column as ProfessorColumn, Entity as Professors,
};
use crate::entity::programs::{ActiveModel, Column, Entity as Programs};
use crate::errors::{EnrollSysError, Result};
use crate::models::catalog::{
    entities::{Professor, Program},
    requests::{CreateProfessorRequest, CreateProgramRequest, UpdateProgramRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

const DEFAULT_DEPARTMENT: &str = "College of Computer Studies";
const DEFAULT_DURATION: i32 = 4;

impl SeaOrmStorage {
    /// 创建专业
    pub async fn create_program_impl(&self, req: CreateProgramRequest) -> Result<Program> {
        let model = ActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            description: Set(req.description),
            duration: Set(req.duration.unwrap_or(DEFAULT_DURATION)),
            department: Set(req
                .department
                .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string())),
            is_active: Set(req.is_active.unwrap_or(true)),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("创建专业失败: {e}")))?;

        Ok(result.into_program())
    }

    /// 通过代码获取专业
    pub async fn get_program_by_code_impl(&self, code: &str) -> Result<Option<Program>> {
        let result = Programs::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询专业失败: {e}")))?;

        Ok(result.map(|m| m.into_program()))
    }

    /// 列出全部专业
    pub async fn list_programs_impl(&self) -> Result<Vec<Program>> {
        let programs = Programs::find()
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询专业列表失败: {e}")))?;

        Ok(programs.into_iter().map(|m| m.into_program()).collect())
    }

    /// 更新专业（代码不可修改）
    pub async fn update_program_impl(
        &self,
        id: i64,
        update: UpdateProgramRequest,
    ) -> Result<Option<Program>> {
        let existing = Programs::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询专业失败: {e}")))?;

        let Some(model) = existing else {
            return Ok(None);
        };

        let mut active: ActiveModel = model.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(duration) = update.duration {
            active.duration = Set(duration);
        }
        if let Some(department) = update.department {
            active.department = Set(department);
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("更新专业失败: {e}")))?;

        Ok(Some(result.into_program()))
    }

    /// 创建教师
    pub async fn create_professor_impl(&self, req: CreateProfessorRequest) -> Result<Professor> {
        let model = ProfessorActiveModel {
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            room: Set(req.room),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("创建教师失败: {e}")))?;

        Ok(result.into_professor())
    }

    /// 列出全部教师
    pub async fn list_professors_impl(&self) -> Result<Vec<Professor>> {
        let professors = Professors::find()
            .order_by_asc(ProfessorColumn::LastName)
            .order_by_asc(ProfessorColumn::FirstName)
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询教师列表失败: {e}")))?;

        Ok(professors.into_iter().map(|m| m.into_professor()).collect())
    }
}
