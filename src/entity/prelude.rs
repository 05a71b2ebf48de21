//! 预导入模块，方便使用

pub use super::academic_histories::{
    ActiveModel as AcademicHistoryActiveModel, Entity as AcademicHistories,
    Model as AcademicHistoryModel,
};
pub use super::academic_years::{
    ActiveModel as AcademicYearActiveModel, Entity as AcademicYears, Model as AcademicYearModel,
};
pub use super::admins::{ActiveModel as AdminActiveModel, Entity as Admins, Model as AdminModel};
pub use super::course_prerequisites::{
    ActiveModel as CoursePrerequisiteActiveModel, Entity as CoursePrerequisites,
    Model as CoursePrerequisiteModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::enroll_details::{
    ActiveModel as EnrollDetailActiveModel, Entity as EnrollDetails, Model as EnrollDetailModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::professors::{
    ActiveModel as ProfessorActiveModel, Entity as Professors, Model as ProfessorModel,
};
pub use super::programs::{
    ActiveModel as ProgramActiveModel, Entity as Programs, Model as ProgramModel,
};
pub use super::schedules::{
    ActiveModel as ScheduleActiveModel, Entity as Schedules, Model as ScheduleModel,
};
pub use super::sections::{
    ActiveModel as SectionActiveModel, Entity as Sections, Model as SectionModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
