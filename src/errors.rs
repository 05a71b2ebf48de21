//! 统一错误类型
//!
//! 每个变体携带一条详情，并在定义处固定错误代码、类型名与 HTTP 状态。

use std::fmt;

use actix_web::http::StatusCode;

macro_rules! define_enrollsys_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum EnrollSysError {
            $($variant(String),)*
        }

        impl EnrollSysError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(EnrollSysError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EnrollSysError::$variant(_) => $type_name,)*
                }
            }

            pub fn status_code(&self) -> StatusCode {
                match self {
                    $(EnrollSysError::$variant(_) => StatusCode::$status,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(EnrollSysError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl EnrollSysError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EnrollSysError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_enrollsys_errors! {
    CacheConnection("E001", "Cache Connection Error", INTERNAL_SERVER_ERROR),
    CachePluginNotFound("E002", "Cache Plugin Not Found", INTERNAL_SERVER_ERROR),
    DatabaseConfig("E003", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E004", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E005", "Database Operation Error", INTERNAL_SERVER_ERROR),
    Validation("E007", "Validation Error", BAD_REQUEST),
    NotFound("E008", "Resource Not Found", NOT_FOUND),
    Serialization("E009", "Serialization Error", INTERNAL_SERVER_ERROR),
    DateParse("E011", "Date Parse Error", BAD_REQUEST),
    Authentication("E012", "Authentication Error", UNAUTHORIZED),
    Authorization("E013", "Authorization Error", FORBIDDEN),
    CapacityExhausted("E014", "Capacity Exhausted", CONFLICT),
}

impl EnrollSysError {
    /// 4xx 错误的详情可以原样返回给调用方
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl fmt::Display for EnrollSysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code(), self.error_type(), self.message())
    }
}

impl std::error::Error for EnrollSysError {}

impl From<sea_orm::DbErr> for EnrollSysError {
    fn from(err: sea_orm::DbErr) -> Self {
        EnrollSysError::DatabaseOperation(err.to_string())
    }
}

impl From<sea_orm::TransactionError<EnrollSysError>> for EnrollSysError {
    fn from(err: sea_orm::TransactionError<EnrollSysError>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(e) => {
                EnrollSysError::DatabaseOperation(e.to_string())
            }
            sea_orm::TransactionError::Transaction(e) => e,
        }
    }
}

impl From<serde_json::Error> for EnrollSysError {
    fn from(err: serde_json::Error) -> Self {
        EnrollSysError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EnrollSysError {
    fn from(err: chrono::ParseError) -> Self {
        EnrollSysError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EnrollSysError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EnrollSysError::cache_connection("test").code(), "E001");
        assert_eq!(EnrollSysError::database_config("test").code(), "E003");
        assert_eq!(EnrollSysError::validation("test").code(), "E007");
        assert_eq!(EnrollSysError::authentication("test").code(), "E012");
        assert_eq!(EnrollSysError::capacity_exhausted("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EnrollSysError::capacity_exhausted("full").error_type(),
            "Capacity Exhausted"
        );
        assert_eq!(
            EnrollSysError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            EnrollSysError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EnrollSysError::capacity_exhausted("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            EnrollSysError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EnrollSysError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(!EnrollSysError::database_operation("x").is_client_error());
        assert!(EnrollSysError::authorization("x").is_client_error());
    }

    #[test]
    fn test_display_includes_code_and_detail() {
        let err = EnrollSysError::validation("Please select at least one course schedule");
        assert_eq!(
            err.to_string(),
            "[E007] Validation Error: Please select at least one course schedule"
        );
    }

    #[test]
    fn test_transaction_error_unwraps_inner() {
        let err: EnrollSysError = sea_orm::TransactionError::Transaction(
            EnrollSysError::capacity_exhausted("No available sections"),
        )
        .into();
        assert_eq!(err, EnrollSysError::capacity_exhausted("No available sections"));
    }
}
