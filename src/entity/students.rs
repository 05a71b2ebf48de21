//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub program_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub gender: String,
    pub contact_number: String,
    pub date_of_birth: chrono::NaiveDate,
    pub address: String,
    pub city_address: String,
    pub email: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::programs::Entity",
        from = "Column::ProgramId",
        to = "super::programs::Column::Id"
    )]
    Program,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::users::entities::Student {
        use crate::models::users::entities::{Gender, Student};
        use chrono::{DateTime, Utc};

        Student {
            id: self.id,
            user_id: self.user_id,
            program_id: self.program_id,
            first_name: self.first_name,
            last_name: self.last_name,
            middle_name: self.middle_name,
            gender: self.gender.parse::<Gender>().unwrap_or(Gender::Male),
            contact_number: self.contact_number,
            date_of_birth: self.date_of_birth,
            address: self.address,
            city_address: self.city_address,
            email: self.email,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
