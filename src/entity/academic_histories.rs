//! 学业记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "academic_histories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_code: String,
    pub enrollment_id: i64,
    pub student_id: i64,
    pub remark: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
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
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id"
    )]
    Enrollment,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> crate::models::academic::entities::AcademicRecord {
        use crate::models::academic::entities::{AcademicRecord, Remark};
        use chrono::{DateTime, Utc};

        AcademicRecord {
            id: self.id,
            course_code: self.course_code,
            enrollment_id: self.enrollment_id,
            student_id: self.student_id,
            remark: self.remark.and_then(|r| r.parse::<Remark>().ok()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
