//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod academic_histories;
pub mod academic_years;
pub mod admins;
pub mod course_prerequisites;
pub mod courses;
pub mod enroll_details;
pub mod enrollments;
pub mod professors;
pub mod programs;
pub mod schedules;
pub mod sections;
pub mod students;
pub mod users;
