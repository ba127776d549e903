//! Page parameters and the pagination block returned by the list endpoints.

use serde::Serialize;

use crate::store::PageWindow;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Largest offset the document store accepts (it encodes `skip` as a signed 64-bit integer).
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// Sanitized 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a request from raw query-string values. Unparseable values fall back to the
    /// defaults; a page below 1 becomes 1 and the limit is kept within `1..=MAX_LIMIT`.
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = parse_number(page).map_or(DEFAULT_PAGE, |page| page.max(1) as u64);
        let limit = match parse_number(limit) {
            Some(limit) if limit >= 1 => (limit as u64).min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };
        Self { page, limit }
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            skip: (self.page - 1).saturating_mul(self.limit).min(MAX_SKIP),
            limit: self.limit,
        }
    }

    pub fn pagination(&self, total: u64) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total,
            pages: total.div_ceil(self.limit),
        }
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

/// Pagination metadata echoed next to every list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

/// Value of `key` in raw query-string pairs; a repeated key keeps its first value.
pub(crate) fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}

/// Treats an absent or blank query value as not supplied.
pub(crate) fn non_blank(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|value| !value.is_empty())
}
