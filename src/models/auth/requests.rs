use serde::Deserialize;
use ts_rs::TS;

// 登录请求：学生或管理员 ID + 出生日期
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    /// 学生 ID 或管理员 ID
    pub id: i64,
    /// 出生日期 (YYYY-MM-DD)
    pub date_of_birth: chrono::NaiveDate,
}
