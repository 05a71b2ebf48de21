//! 安全的路径参数提取器
//!
//! 解析失败时直接返回统一格式的 400 响应，而不是 actix 默认的纯文本错误。

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 正整数 ID 路径参数
macro_rules! define_id_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let raw = req.match_info().get($param).unwrap_or_default();
                ready(match raw.parse::<i64>() {
                    Ok(id) if id > 0 => Ok($name(id)),
                    _ => Err(bad_path(format!("Invalid {}: {}", $param, raw))),
                })
            }
        }
    };
}

define_id_extractor!(SafeIDI64, "id");
define_id_extractor!(SafeStudentIdI64, "student_id");

/// 课程代码路径参数：字母、数字、空格或连字符，最长 20 个字符
#[derive(Debug, Clone)]
pub struct SafeCourseCode(pub String);

impl FromRequest for SafeCourseCode {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("code").unwrap_or_default().trim();
        let valid = !raw.is_empty()
            && raw.len() <= 20
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-');

        ready(if valid {
            Ok(SafeCourseCode(raw.to_string()))
        } else {
            Err(bad_path(format!("Invalid course code: {raw}")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_id_extractor() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);

        let req = TestRequest::default().param("id", "-1").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());

        let req = TestRequest::default().param("id", "abc").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_course_code_extractor() {
        let req = TestRequest::default()
            .param("code", "IT 101")
            .to_http_request();
        let code = SafeCourseCode::extract(&req).await.unwrap();
        assert_eq!(code.0, "IT 101");

        let req = TestRequest::default()
            .param("code", "IT';--")
            .to_http_request();
        assert!(SafeCourseCode::extract(&req).await.is_err());
    }
}
