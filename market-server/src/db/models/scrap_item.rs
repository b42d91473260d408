//! Scrap Item Model
//!
//! Catalog of collectible scrap categories with per-kg rates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Scrap category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScrapCategory {
    Plastic,
    Metal,
    Paper,
    Glass,
    Electronic,
    Other,
}

/// Catalog entry matching the `scrap_item` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapItem {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub category: ScrapCategory,
    pub price_per_kg: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapItemCreate {
    pub name: String,
    pub category: ScrapCategory,
    pub price_per_kg: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Partial update payload (merge semantics)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ScrapCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
