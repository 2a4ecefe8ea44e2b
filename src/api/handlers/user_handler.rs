//! User CRUD handlers.

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::{JsonBody, QueryParams, UserId};
use crate::api::AppState;
use crate::domain::{CreateUser, UpdateUser, UserResponse};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, PaginatedUsers, PaginationQuery};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/all", get(list_all_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Malformed body or validation error")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUser>,
) -> AppResult<Created<UserResponse>> {
    let service = &state.user_service;
    let user = service.create_user(payload).await?;

    Ok(Created(user.to_response(service.today())))
}

/// List users one page at a time
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "One page of users", body = PaginatedUsers),
        (status = 400, description = "Malformed query string")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PaginationQuery>,
) -> AppResult<Json<PaginatedUsers>> {
    let service = &state.user_service;
    let page = service.list_users(query.normalize()).await?;
    let today = service.today();

    Ok(Json(page.map(|user| user.to_response(today))))
}

/// List every user without pagination
#[utoipa::path(
    get,
    path = "/users/all",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [UserResponse])
    )
)]
pub async fn list_all_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let service = &state.user_service;
    let users = service.list_all_users().await?;
    let today = service.today();

    Ok(Json(users.iter().map(|user| user.to_response(today)).collect()))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> AppResult<Json<UserResponse>> {
    let service = &state.user_service;
    let user = service.get_user(id).await?;

    Ok(Json(user.to_response(service.today())))
}

/// Update user; omitted or blank fields keep their stored value
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid user ID, malformed body or validation error"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User changed concurrently")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    JsonBody(payload): JsonBody<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let service = &state.user_service;
    let user = service.update_user(id, payload).await?;

    Ok(Json(user.to_response(service.today())))
}

/// Delete user permanently
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(State(state): State<AppState>, UserId(id): UserId) -> AppResult<NoContent> {
    state.user_service.delete_user(id).await?;
    Ok(NoContent)
}
