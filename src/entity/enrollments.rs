//! 选课记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub section_id: Option<i64>,
    pub academic_year_id: i64,
    pub year_level: String,
    pub semester: String,
    pub status: String,
    pub is_regular: bool,
    pub enrolled_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::sections::Entity",
        from = "Column::SectionId",
        to = "super::sections::Column::Id"
    )]
    Section,
    #[sea_orm(
        belongs_to = "super::academic_years::Entity",
        from = "Column::AcademicYearId",
        to = "super::academic_years::Column::Id"
    )]
    AcademicYear,
    #[sea_orm(has_many = "super::enroll_details::Entity")]
    EnrollDetails,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::academic_years::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicYear.def()
    }
}

impl Related<super::enroll_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnrollDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_enrollment(self) -> crate::models::enrollments::entities::Enrollment {
        use crate::models::catalog::entities::{Semester, YearLevel};
        use crate::models::enrollments::entities::{Enrollment, EnrollmentStatus};
        use chrono::{DateTime, Utc};

        Enrollment {
            id: self.id,
            student_id: self.student_id,
            section_id: self.section_id,
            academic_year_id: self.academic_year_id,
            year_level: self.year_level.parse::<YearLevel>().unwrap_or(YearLevel::First),
            semester: self.semester.parse::<Semester>().unwrap_or(Semester::First),
            status: self
                .status
                .parse::<EnrollmentStatus>()
                .unwrap_or(EnrollmentStatus::Pending),
            is_regular: self.is_regular,
            enrolled_at: DateTime::<Utc>::from_timestamp(self.enrolled_at, 0).unwrap_or_default(),
        }
    }
}
