//! 选课明细实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enroll_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub enrollment_id: i64,
    pub mis_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id"
    )]
    Enrollment,
    #[sea_orm(
        belongs_to = "super::schedules::Entity",
        from = "Column::MisCode",
        to = "super::schedules::Column::MisCode"
    )]
    Schedule,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl Related<super::schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_enroll_detail(self) -> crate::models::enrollments::entities::EnrollDetail {
        crate::models::enrollments::entities::EnrollDetail {
            id: self.id,
            enrollment_id: self.enrollment_id,
            mis_code: self.mis_code,
        }
    }
}
