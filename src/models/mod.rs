//! 数据模型定义
//!
//! 业务实体、请求/响应 DTO 以及统一响应结构。

/// 定义以可读标签存储的枚举（如 "First Year"、"Pending"）
///
/// 生成 serde 重命名、`as_str()`、`ALL`、`Display` 与 `FromStr`，
/// 变体的声明顺序即排序顺序。
macro_rules! define_label_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize, ts_rs::TS,
        )]
        $(#[$meta])*
        $vis enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {s}", stringify!($name))),
                }
            }
        }
    };
}

pub mod academic;
pub mod auth;
pub mod catalog;
pub mod common;
pub mod enrollments;
pub mod users;

pub use common::{ApiResponse, PageRequest, PaginatedResponse, PaginationInfo, PaginationQuery};

use serde::Serialize;
use ts_rs::TS;

use crate::errors::EnrollSysError;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/error_code.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    RegisterFailed = 2001,

    // 用户
    StudentNotFound = 3000,
    AdminNotFound = 3001,
    StudentEmailInvalid = 3002,
    StudentContactInvalid = 3003,

    // 课程目录
    ProgramNotFound = 4000,
    ProgramAlreadyExists = 4001,
    CourseNotFound = 4010,
    CourseAlreadyExists = 4011,
    SectionNotFound = 4020,
    ScheduleCreationFailed = 4030,
    ScheduleTimeInvalid = 4031,
    AcademicYearNotFound = 4040,
    AcademicYearAlreadyExists = 4041,
    AcademicYearLabelInvalid = 4042,

    // 选课
    EnrollmentNotFound = 5000,
    EnrollmentInvalid = 5001,
    SectionCapacityExhausted = 5002,
    RemarksInvalid = 5003,
}

impl From<&EnrollSysError> for ErrorCode {
    fn from(err: &EnrollSysError) -> Self {
        match err {
            EnrollSysError::Validation(_) | EnrollSysError::DateParse(_) => ErrorCode::BadRequest,
            EnrollSysError::NotFound(_) => ErrorCode::NotFound,
            EnrollSysError::CapacityExhausted(_) => ErrorCode::SectionCapacityExhausted,
            EnrollSysError::Authentication(_) => ErrorCode::AuthFailed,
            EnrollSysError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }
}
