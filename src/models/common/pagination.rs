use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// 分页查询参数，页码与条数可写成数字或数字字符串
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(default, deserialize_with = "lenient_i64")]
    #[ts(type = "number | null")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    #[ts(type = "number | null")]
    pub size: Option<i64>,
}

/// 规范化后的分页窗口：页码从 1 开始，每页 1..=MAX_PAGE_SIZE 条
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, size: Option<i64>) -> Self {
        let clamp = |v: i64| u64::try_from(v).unwrap_or(0).max(1);
        Self {
            page: page.map(clamp).unwrap_or(1),
            size: size.map(clamp).unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        }
    }

    /// SeaORM 分页器的页号从 0 开始
    pub fn zero_based(&self) -> u64 {
        self.page - 1
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn from_total(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page as i64,
            page_size: request.size as i64,
            total: total as i64,
            total_pages: total.div_ceil(request.size) as i64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 查询串经 flatten 后只剩字符串
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid integer: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, size: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(-5)), PageRequest { page: 1, size: 1 });
        assert_eq!(PageRequest::new(Some(3), Some(500)).size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(Some(3), None).zero_based(), 2);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest::new(Some(1), Some(10));
        assert_eq!(PaginationInfo::from_total(request, 0).total_pages, 0);
        assert_eq!(PaginationInfo::from_total(request, 10).total_pages, 1);
        assert_eq!(PaginationInfo::from_total(request, 11).total_pages, 2);
    }

    #[test]
    fn test_query_accepts_string_numbers() {
        let query: PaginationQuery =
            serde_json::from_str(r#"{"page": "2", "size": 25}"#).unwrap();
        assert_eq!((query.page, query.size), (Some(2), Some(25)));

        let query: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!((query.page, query.size), (None, None));

        assert!(serde_json::from_str::<PaginationQuery>(r#"{"page": "two"}"#).is_err());
    }
}
