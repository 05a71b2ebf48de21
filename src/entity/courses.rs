//! 课程实体（课程代码为主键）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub professor_id: Option<i64>,
    pub program_id: Option<i64>,
    pub year_level: String,
    pub semester: String,
    pub name: String,
    pub units: i32,
    pub lec_hours: i32,
    pub lab_hours: i32,
    pub remarks: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::professors::Entity",
        from = "Column::ProfessorId",
        to = "super::professors::Column::Id"
    )]
    Professor,
    #[sea_orm(
        belongs_to = "super::programs::Entity",
        from = "Column::ProgramId",
        to = "super::programs::Column::Id"
    )]
    Program,
    #[sea_orm(has_many = "super::schedules::Entity")]
    Schedules,
}

impl Related<super::professors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professor.def()
    }
}

impl Related<super::programs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Program.def()
    }
}

impl Related<super::schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 转换为业务模型，先修课程代码由调用方单独查询后传入
    pub fn into_course(self, prerequisites: Vec<String>) -> crate::models::catalog::entities::Course {
        use crate::models::catalog::entities::{Course, Semester, YearLevel};

        Course {
            code: self.code,
            name: self.name,
            year_level: self.year_level.parse::<YearLevel>().unwrap_or(YearLevel::First),
            semester: self.semester.parse::<Semester>().unwrap_or(Semester::First),
            units: self.units,
            lec_hours: self.lec_hours,
            lab_hours: self.lab_hours,
            program_id: self.program_id,
            professor_id: self.professor_id,
            remarks: self.remarks,
            prerequisites,
        }
    }
}
