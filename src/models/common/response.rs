use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

/// 所有接口共用的响应包装，`code` 为 0 表示成功
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
}

impl<T: TS> ApiResponse<T> {
    fn build(code: ErrorCode, data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Success, Some(data), message)
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Success, None, message)
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(code, None, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_is_omitted() {
        let body = serde_json::to_value(ApiResponse::error_empty(ErrorCode::NotFound, "gone"))
            .unwrap();
        assert_eq!(body["code"], ErrorCode::NotFound as i32);
        assert_eq!(body["message"], "gone");
        assert!(body.get("data").is_none());
    }
}
