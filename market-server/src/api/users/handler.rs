//! User API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserRole, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_list, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub role: Option<UserRole>,
}

/// GET /api/users - 获取所有用户 (可按角色过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<User>>>> {
    let users = UserRepository::new(state.db.clone())
        .find_all(query.role)
        .await?;
    Ok(ok_list(users))
}

/// GET /api/users/:id - 获取单个用户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<User>>> {
    let user = UserRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(ok(user))
}

/// POST /api/users - 直接创建用户
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<AppResponse<User>>)> {
    validate_required_text(&payload.username, "username", MAX_NAME_LEN)?;
    validate_required_text(&payload.email, "email", MAX_NAME_LEN)?;
    validate_required_text(&payload.clerk_id, "clerk_id", MAX_NAME_LEN)?;

    let user = UserRepository::new(state.db.clone())
        .create(payload, false)
        .await?;
    Ok((StatusCode::CREATED, ok(user)))
}

/// POST /api/users/clerk-signup - 注册后创建角色档案 (幂等)
///
/// If a profile already exists for (clerk_id, role), it is returned as-is
/// instead of an error - signup callbacks may fire more than once.
pub async fn clerk_signup(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<AppResponse<User>>)> {
    let repo = UserRepository::new(state.db.clone());

    if let Some(existing) = repo
        .find_by_clerk_id(&payload.clerk_id, payload.role)
        .await?
    {
        return Ok((
            StatusCode::OK,
            ok_with_message(existing, "User already exists for this role"),
        ));
    }

    let role = payload.role;
    let user = repo.create(payload, false).await?;
    Ok((
        StatusCode::CREATED,
        ok_with_message(
            user,
            format!("User profile created successfully for role: {role}"),
        ),
    ))
}

/// PUT /api/users/:id - 更新用户
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<AppResponse<User>>> {
    let user = UserRepository::new(state.db.clone())
        .update(&id, payload)
        .await?;
    Ok(ok(user))
}

/// DELETE /api/users/:id - 删除用户
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let deleted = UserRepository::new(state.db.clone()).delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found("User not found"));
    }
    Ok(ok_with_message((), "User deleted"))
}
