//! JSON body extractor with `AppError` rejections.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// JSON extractor that reports malformed bodies as `400 BAD_REQUEST`.
///
/// Only deserialization happens here. Domain validation runs afterwards
/// in the service, so the same rules apply regardless of transport.
///
/// # Example
///
/// ```rust,ignore
/// use user_api::api::extractors::JsonBody;
/// use user_api::domain::CreateUser;
///
/// async fn create_user(JsonBody(payload): JsonBody<CreateUser>) {
///     // payload is well-formed JSON, not yet validated
/// }
/// ```
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(format!("Invalid request body: {}", e.body_text())))?;

        Ok(JsonBody(value))
    }
}
