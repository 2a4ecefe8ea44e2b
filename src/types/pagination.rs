//! Pagination types for list endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::UserResponse;

/// Raw pagination query as sent by the client.
///
/// Values are accepted as given (including zero, negative or non-numeric
/// input) and clamped by [`PaginationQuery::normalize`].
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page number, 1-indexed (default: 1)
    #[serde(default, deserialize_with = "lenient_int")]
    #[param(value_type = Option<i64>, example = 1)]
    pub page: Option<i64>,
    /// Items per page (default: 10, max: 100). `page_size` is accepted as an alias.
    #[serde(default, alias = "page_size", deserialize_with = "lenient_int")]
    #[param(value_type = Option<i64>, example = 10)]
    pub limit: Option<i64>,
}

impl PaginationQuery {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Clamp into valid bounds.
    ///
    /// Missing values take the defaults, so `?page=0&limit=0` and an empty
    /// query both normalize to page 1 of 10.
    pub fn normalize(&self) -> PaginationParams {
        let page = match self.page {
            Some(p) if p >= 1 => p as u64,
            _ => DEFAULT_PAGE_NUMBER,
        };

        let limit = match self.limit {
            Some(l) if l <= 0 => DEFAULT_PAGE_SIZE,
            Some(l) => (l as u64).min(MAX_PAGE_SIZE),
            None => DEFAULT_PAGE_SIZE,
        };

        PaginationParams { page, limit }
    }
}

/// Query values that fail to parse as integers are treated as absent.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.trim().parse().ok()))
}

/// Normalized pagination parameters (always in range)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u64,
    pub limit: u64,
}

impl PaginationParams {
    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)).saturating_mul(self.limit)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper (reusable for all list responses)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[aliases(PaginatedUsers = Paginated<UserResponse>)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, params: PaginationParams, total: u64) -> Self {
        Self {
            data,
            page: params.page,
            limit: params.limit,
            total,
            total_pages: total_pages(total, params.limit),
        }
    }

    /// Transform the items, keeping the page metadata
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Ceiling division of `total` by `limit`; 0 when either is 0.
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}
