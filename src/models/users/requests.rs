use super::entities::Gender;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 学生注册请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct RegisterStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub gender: Gender,
    pub contact_number: String,
    pub date_of_birth: chrono::NaiveDate,
    pub address: String,
    pub city_address: String,
    pub email: String,
    /// 专业代码，如 "BSIT"
    pub program_code: Option<String>,
}

// 新学生（存储层使用，专业已解析）
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub program_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub gender: Gender,
    pub contact_number: String,
    pub date_of_birth: chrono::NaiveDate,
    pub address: String,
    pub city_address: String,
    pub email: String,
}

// 创建管理员请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateAdminRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: chrono::NaiveDate,
    pub email: String,
}

// 学生列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub gender: Option<Gender>,
    pub search: Option<String>,
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub gender: Option<Gender>,
    pub search: Option<String>,
}

impl From<StudentListParams> for StudentListQuery {
    fn from(params: StudentListParams) -> Self {
        Self {
            page: params.pagination.page,
            size: params.pagination.size,
            gender: params.gender,
            search: params.search,
        }
    }
}
