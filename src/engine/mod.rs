//! 选课资格与分配引擎
//!
//! 所有入口都显式接收调用方上下文（学生 + 当前学年），不依赖任何会话状态。

pub mod approval;
pub mod available_courses;
pub mod overview;
pub mod progression;
pub mod regularity;
pub mod submission;

#[cfg(test)]
mod tests;

use crate::errors::{EnrollSysError, Result};
use crate::models::catalog::entities::AcademicYear;
use crate::models::enrollments::entities::{Enrollment, EnrollmentStatus};
use crate::models::users::entities::{Principal, Student};
use crate::storage::Storage;

pub use approval::{approve_enrollment, record_remarks, reject_enrollment};
pub use available_courses::{CourseHistory, resolve_available};
pub use overview::build_overview;
pub use progression::{check_regression, check_year_level_override, default_term};
pub use regularity::{Regularity, classify};
pub use submission::{split_schedule_codes, submit_enrollment};

/// 一次选课决策的上下文
#[derive(Debug, Clone)]
pub struct EnrollmentContext {
    pub student: Student,
    pub academic_year: AcademicYear,
}

impl EnrollmentContext {
    pub fn new(student: Student, academic_year: AcademicYear) -> Self {
        Self {
            student,
            academic_year,
        }
    }

    /// 从已认证的调用方解析上下文
    pub async fn resolve(storage: &dyn Storage, principal: &Principal) -> Result<Self> {
        let student_id = principal
            .student_id()
            .ok_or_else(|| EnrollSysError::authorization("Only students can enroll"))?;

        let student = storage
            .get_student_by_id(student_id)
            .await?
            .ok_or_else(|| EnrollSysError::not_found(format!("Student {student_id} not found")))?;

        let academic_year = storage
            .current_academic_year()
            .await?
            .ok_or_else(|| EnrollSysError::not_found("No academic year has been configured"))?;

        Ok(Self::new(student, academic_year))
    }

    pub fn student_id(&self) -> i64 {
        self.student.id
    }

    /// 本学年已通过的选课记录
    pub async fn approved_this_year(&self, storage: &dyn Storage) -> Result<Vec<Enrollment>> {
        storage
            .list_enrollments_in_year(
                self.student.id,
                self.academic_year.id,
                EnrollmentStatus::Approved,
            )
            .await
    }

    /// 按本学年最近一次已通过选课的成绩备注分类
    pub async fn regularity(
        &self,
        storage: &dyn Storage,
        approved_this_year: &[Enrollment],
    ) -> Result<Regularity> {
        match progression::latest_in_year(approved_this_year) {
            Some(latest) => {
                let records = storage.list_enrollment_records(latest.id).await?;
                Ok(classify(&records))
            }
            None => Ok(Regularity::regular()),
        }
    }
}
