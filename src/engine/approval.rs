//! 审核与成绩录入
//!
//! 审核是无条件的状态写入：不重新校验容量，重复审核不报错。

use tracing::info;

use crate::errors::{EnrollSysError, Result};
use crate::models::academic::entities::AcademicRecord;
use crate::models::enrollments::{
    entities::{Enrollment, EnrollmentStatus},
    requests::RemarkEntry,
};
use crate::storage::Storage;

async fn write_status(
    storage: &dyn Storage,
    enrollment_id: i64,
    status: EnrollmentStatus,
) -> Result<Enrollment> {
    let enrollment = storage
        .update_enrollment_status(enrollment_id, status)
        .await?
        .ok_or_else(|| EnrollSysError::not_found(format!("Enrollment #{enrollment_id} not found")))?;

    info!("Enrollment #{} marked {}", enrollment_id, status);
    Ok(enrollment)
}

pub async fn approve_enrollment(storage: &dyn Storage, enrollment_id: i64) -> Result<Enrollment> {
    write_status(storage, enrollment_id, EnrollmentStatus::Approved).await
}

pub async fn reject_enrollment(storage: &dyn Storage, enrollment_id: i64) -> Result<Enrollment> {
    write_status(storage, enrollment_id, EnrollmentStatus::Rejected).await
}

/// 录入成绩备注，只接受该选课记录绑定的课程
pub async fn record_remarks(
    storage: &dyn Storage,
    enrollment_id: i64,
    entries: Vec<RemarkEntry>,
) -> Result<Vec<AcademicRecord>> {
    if entries.is_empty() {
        return Err(EnrollSysError::validation("No remarks were provided"));
    }

    let enrollment = storage
        .get_enrollment(enrollment_id)
        .await?
        .ok_or_else(|| EnrollSysError::not_found(format!("Enrollment #{enrollment_id} not found")))?;

    storage.upsert_remarks(&enrollment, entries).await
}
