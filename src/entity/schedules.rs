//! 课表时段实体（MIS 码为主键）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub mis_code: String,
    pub section_id: i64,
    pub course_code: String,
    pub day: String,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sections::Entity",
        from = "Column::SectionId",
        to = "super::sections::Column::Id"
    )]
    Section,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseCode",
        to = "super::courses::Column::Code"
    )]
    Course,
    #[sea_orm(has_many = "super::enroll_details::Entity")]
    EnrollDetails,
}

impl Related<super::sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::enroll_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnrollDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_schedule(self) -> crate::models::catalog::entities::Schedule {
        use crate::models::catalog::entities::{Schedule, Weekday};

        Schedule {
            mis_code: self.mis_code,
            section_id: self.section_id,
            course_code: self.course_code,
            day: self.day.parse::<Weekday>().unwrap_or(Weekday::Monday),
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}
