//! Scrap Item Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{ScrapCategory, ScrapItem, ScrapItemCreate, ScrapItemUpdate};

const TABLE: &str = "scrap_item";

#[derive(Clone)]
pub struct ScrapItemRepository {
    base: BaseRepository,
}

impl ScrapItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List catalog entries, optionally filtered by category and active flag
    pub async fn find_all(
        &self,
        category: Option<ScrapCategory>,
        is_active: Option<bool>,
    ) -> RepoResult<Vec<ScrapItem>> {
        let mut sql = String::from("SELECT * FROM type::table($table)");
        let mut clauses = Vec::new();
        if category.is_some() {
            clauses.push("category = $category");
        }
        if is_active.is_some() {
            clauses.push("is_active = $is_active");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self.base.db().query(sql).bind(("table", TABLE));
        if let Some(category) = category {
            query = query.bind(("category", category));
        }
        if let Some(is_active) = is_active {
            query = query.bind(("is_active", is_active));
        }

        let items: Vec<ScrapItem> = query.await?.take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ScrapItem>> {
        let item: Option<ScrapItem> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(item)
    }

    pub async fn create(&self, data: ScrapItemCreate) -> RepoResult<ScrapItem> {
        let now = chrono::Utc::now();
        let item = ScrapItem {
            id: None,
            name: data.name,
            category: data.category,
            price_per_kg: data.price_per_kg,
            description: data.description,
            image: data.image,
            is_active: data.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        let created: Option<ScrapItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create scrap item".to_string()))
    }

    pub async fn update(&self, id: &str, data: ScrapItemUpdate) -> RepoResult<ScrapItem> {
        let mut data =
            serde_json::to_value(&data).map_err(|e| RepoError::Database(e.to_string()))?;
        data["updated_at"] = serde_json::json!(chrono::Utc::now());

        let items: Vec<ScrapItem> = self
            .base
            .db()
            .query("UPDATE $item MERGE $data RETURN AFTER")
            .bind(("item", record_id(TABLE, id)))
            .bind(("data", data))
            .await?
            .take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Scrap item {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let deleted: Option<ScrapItem> = self.base.db().delete(record_id(TABLE, id)).await?;
        Ok(deleted.is_some())
    }
}
