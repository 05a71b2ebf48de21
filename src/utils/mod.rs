pub mod extractor;
pub mod jwt;
pub mod mis_code;
pub mod parameter_error_handler;
pub mod sql;
pub mod validate;

pub use extractor::{SafeCourseCode, SafeIDI64, SafeStudentIdI64};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
