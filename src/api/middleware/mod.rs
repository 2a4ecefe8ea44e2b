//! API middleware.

mod request_id;

pub use request_id::{make_request_span, MakeRequestUuid};
