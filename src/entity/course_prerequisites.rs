//! 先修课程关联实体（course_code 依赖 prerequisite_code）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_prerequisites")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_code: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub prerequisite_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseCode",
        to = "super::courses::Column::Code"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::PrerequisiteCode",
        to = "super::courses::Column::Code"
    )]
    Prerequisite,
}

impl ActiveModelBehavior for ActiveModel {}
