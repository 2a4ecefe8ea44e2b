//! Shared types for list and response handling.

mod pagination;
mod response;

pub use pagination::{total_pages, Paginated, PaginatedUsers, PaginationParams, PaginationQuery};
pub use response::{Created, NoContent};
