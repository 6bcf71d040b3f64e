//! Staff account handlers, admin only

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use uuid::Uuid;

use core_kernel::UserId;

use crate::auth::{roles, Claims};
use crate::dto::users::{UserRequest, UserResponse};
use crate::{error::ApiError, AppState};

pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    claims.require(roles::ADMIN)?;
    let users = state.backends.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    claims.require(roles::ADMIN)?;
    Ok(Json(state.backends.users.get_user(UserId::from(id)).await?.into()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<UserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    claims.require(roles::ADMIN)?;
    let user = request.into_user();
    user.check()?;

    let user = state.backends.users.save_user(user).await?;
    info!(user_id = %user.id, user_type = ?user.user_type(), "User created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(request): Json<UserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    claims.require(roles::ADMIN)?;
    let existing = state.backends.users.get_user(UserId::from(id)).await?;
    let mut user = request.into_user();
    user.id = existing.id;
    user.created_at = existing.created_at;
    user.check()?;

    Ok(Json(state.backends.users.save_user(user).await?.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    claims.require(roles::ADMIN)?;
    state.backends.users.delete_user(UserId::from(id)).await?;
    info!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
