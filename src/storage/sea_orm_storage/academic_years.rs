//! 学年存储操作

use super::SeaOrmStorage;
use crate::entity::academic_years::{ActiveModel, Column, Entity as AcademicYears};
use crate::errors::{EnrollSysError, Result};
use crate::models::catalog::entities::AcademicYear;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建学年
    pub async fn create_academic_year_impl(&self, label: &str) -> Result<AcademicYear> {
        let model = ActiveModel {
            label: Set(label.to_string()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("创建学年失败: {e}")))?;

        Ok(result.into_academic_year())
    }

    /// 通过 ID 获取学年
    pub async fn get_academic_year_impl(&self, id: i64) -> Result<Option<AcademicYear>> {
        let result = AcademicYears::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学年失败: {e}")))?;

        Ok(result.map(|m| m.into_academic_year()))
    }

    /// 当前学年（最近创建）
    pub async fn current_academic_year_impl(&self) -> Result<Option<AcademicYear>> {
        let result = AcademicYears::find()
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询当前学年失败: {e}")))?;

        Ok(result.map(|m| m.into_academic_year()))
    }

    /// 列出全部学年（新的在前）
    pub async fn list_academic_years_impl(&self) -> Result<Vec<AcademicYear>> {
        let years = AcademicYears::find()
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学年列表失败: {e}")))?;

        Ok(years.into_iter().map(|m| m.into_academic_year()).collect())
    }
}
