//! User CRUD handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, ApiResult, ok};
use crate::account::{NewUserRequest, User, UserId, UserUpdateRequest};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserIdQuery {
    /// User id
    #[param(value_type = i32)]
    pub id: UserId,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedUser {
    #[schema(value_type = i32)]
    pub id: UserId,
}

/// GET /usuarios
#[utoipa::path(
    get,
    path = "/usuarios",
    responses(
        (status = 200, description = "All users with balances", body = Vec<User>, content_type = "application/json"),
        (status = 500, description = "Internal error")
    ),
    tag = "User"
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Vec<User>> {
    let users = state.accounts.list().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list users");
        ApiError::from(e)
    })?;
    ok(users)
}

/// POST /usuario
#[utoipa::path(
    post,
    path = "/usuario",
    request_body = NewUserRequest,
    responses(
        (status = 201, description = "User created", body = User, content_type = "application/json"),
        (status = 400, description = "Malformed body, blank name, or invalid balance"),
        (status = 500, description = "Internal error")
    ),
    tag = "User"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let Json(req) = payload?;
    let user = state
        .accounts
        .create(&req.name, req.balance)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Failed to create user");
            ApiError::from(e)
        })?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// PUT /usuario?id=N
#[utoipa::path(
    put,
    path = "/usuario",
    params(UserIdQuery),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "User updated", body = User, content_type = "application/json"),
        (status = 400, description = "Malformed body, blank name, or invalid balance"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    ),
    tag = "User"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
    payload: Result<Json<UserUpdateRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Query(query) = query?;
    let Json(req) = payload?;
    let user = state
        .accounts
        .update(query.id, &req.name, req.balance)
        .await
        .map_err(|e| {
            tracing::warn!(user_id = query.id, error = %e, "Failed to update user");
            ApiError::from(e)
        })?;
    ok(user)
}

/// DELETE /usuario?id=N
#[utoipa::path(
    delete,
    path = "/usuario",
    params(UserIdQuery),
    responses(
        (status = 200, description = "User deleted", body = DeletedUser, content_type = "application/json"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User is referenced by transfers"),
        (status = 500, description = "Internal error")
    ),
    tag = "User"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> ApiResult<DeletedUser> {
    let Query(query) = query?;
    state.accounts.delete(query.id).await.map_err(|e| {
        tracing::warn!(user_id = query.id, error = %e, "Failed to delete user");
        ApiError::from(e)
    })?;
    Ok(Json(ApiResponse::success_with_msg(
        DeletedUser { id: query.id },
        "Usuario eliminado exitosamente",
    )))
}
