use super::entities::Student;
use crate::models::common::PaginatedResponse;

pub type StudentListResponse = PaginatedResponse<Student>;
