//! Scrap Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{ScrapCategory, ScrapItem, ScrapItemCreate, ScrapItemUpdate};
use crate::db::repository::ScrapItemRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_list, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<ScrapCategory>,
    pub is_active: Option<bool>,
}

/// GET /api/scrap-items - 获取废品目录 (可过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<ScrapItem>>>> {
    let items = ScrapItemRepository::new(state.db.clone())
        .find_all(query.category, query.is_active)
        .await?;
    Ok(ok_list(items))
}

/// GET /api/scrap-items/:id - 获取单个条目
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<ScrapItem>>> {
    let item = ScrapItemRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Scrap item not found"))?;
    Ok(ok(item))
}

/// POST /api/scrap-items - 创建条目
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ScrapItemCreate>,
) -> AppResult<(StatusCode, Json<AppResponse<ScrapItem>>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if payload.price_per_kg < 0.0 {
        return Err(AppError::validation("price_per_kg must not be negative"));
    }

    let item = ScrapItemRepository::new(state.db.clone())
        .create(payload)
        .await?;
    Ok((StatusCode::CREATED, ok(item)))
}

/// PUT /api/scrap-items/:id - 更新条目
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ScrapItemUpdate>,
) -> AppResult<Json<AppResponse<ScrapItem>>> {
    if let Some(price) = payload.price_per_kg {
        if price < 0.0 {
            return Err(AppError::validation("price_per_kg must not be negative"));
        }
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let item = ScrapItemRepository::new(state.db.clone())
        .update(&id, payload)
        .await?;
    Ok(ok(item))
}

/// DELETE /api/scrap-items/:id - 删除条目
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let deleted = ScrapItemRepository::new(state.db.clone()).delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found("Scrap item not found"));
    }
    Ok(ok_with_message((), "Scrap item deleted"))
}
