pub mod pagination;
pub mod response;

pub use pagination::{PageRequest, PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
