//! 班级（Section）实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub program_id: Option<i64>,
    pub year_level: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::programs::Entity",
        from = "Column::ProgramId",
        to = "super::programs::Column::Id"
    )]
    Program,
    #[sea_orm(has_many = "super::schedules::Entity")]
    Schedules,
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
    pub fn into_section(self) -> crate::models::catalog::entities::Section {
        use crate::models::catalog::entities::{Section, YearLevel};

        Section {
            id: self.id,
            name: self.name,
            capacity: self.capacity,
            program_id: self.program_id,
            year_level: self.year_level.parse::<YearLevel>().unwrap_or(YearLevel::First),
        }
    }
}
