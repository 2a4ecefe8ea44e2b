//! Custom request extractors.
//!
//! Rejections are converted to `AppError` so every malformed request
//! gets the same JSON error body.

mod json_body;
mod query_params;
mod user_id;

pub use json_body::JsonBody;
pub use query_params::QueryParams;
pub use user_id::{UserId, INVALID_USER_ID};
