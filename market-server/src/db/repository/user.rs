//! User Repository
//!
//! Profile directory lookups keyed by (clerk_id, role). The order handlers
//! fetch referenced profiles in one batched query rather than per order.

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{User, UserCreate, UserRole, UserUpdate};

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find one role-scoped profile by external identity
    pub async fn find_by_clerk_id(
        &self,
        clerk_id: &str,
        role: UserRole,
    ) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query(
                "SELECT * FROM type::table($table) \
                 WHERE clerk_id = $clerk_id AND role = $role LIMIT 1",
            )
            .bind(("table", TABLE))
            .bind(("clerk_id", clerk_id.to_string()))
            .bind(("role", role))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Batched profile fetch for order annotation (one query, not N+1)
    pub async fn find_by_clerk_ids(
        &self,
        clerk_ids: Vec<String>,
        role: UserRole,
    ) -> RepoResult<Vec<User>> {
        if clerk_ids.is_empty() {
            return Ok(Vec::new());
        }
        let users: Vec<User> = self
            .base
            .db()
            .query(
                "SELECT * FROM type::table($table) \
                 WHERE clerk_id INSIDE $clerk_ids AND role = $role",
            )
            .bind(("table", TABLE))
            .bind(("clerk_ids", clerk_ids))
            .bind(("role", role))
            .await?
            .take(0)?;
        Ok(users)
    }

    /// All profiles, optionally restricted to one role
    pub async fn find_all(&self, role: Option<UserRole>) -> RepoResult<Vec<User>> {
        let users: Vec<User> = match role {
            Some(role) => self
                .base
                .db()
                .query(
                    "SELECT * FROM type::table($table) WHERE role = $role \
                     ORDER BY created_at DESC",
                )
                .bind(("table", TABLE))
                .bind(("role", role))
                .await?
                .take(0)?,
            None => self
                .base
                .db()
                .query("SELECT * FROM type::table($table) ORDER BY created_at DESC")
                .bind(("table", TABLE))
                .await?
                .take(0)?,
        };
        Ok(users)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(user)
    }

    /// Create a profile; (clerk_id, role) must be unique
    pub async fn create(&self, data: UserCreate, profile_completed: bool) -> RepoResult<User> {
        if self
            .find_by_clerk_id(&data.clerk_id, data.role)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "User already exists for role {}",
                data.role
            )));
        }

        let now = chrono::Utc::now();
        let user = User {
            id: None,
            clerk_id: data.clerk_id,
            username: data.username,
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            role: data.role,
            phone_number: data.phone_number,
            address: None,
            business_name: None,
            gstin: None,
            wallet_address: data.wallet_address,
            wallet_reminder_dismissed: false,
            profile_completed,
            created_at: now,
            updated_at: now,
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Merge a partial update into a profile
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let mut data =
            serde_json::to_value(&data).map_err(|e| RepoError::Database(e.to_string()))?;
        data["updated_at"] = serde_json::json!(chrono::Utc::now());

        let users: Vec<User> = self
            .base
            .db()
            .query("UPDATE $user MERGE $data RETURN AFTER")
            .bind(("user", record_id(TABLE, id)))
            .bind(("data", data))
            .await?
            .take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Complete onboarding for one (clerk_id, role) profile
    ///
    /// Returns None when no profile exists for that pair.
    pub async fn complete_profile<P: Serialize + Send + 'static>(
        &self,
        clerk_id: &str,
        role: UserRole,
        profile: P,
    ) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query(
                "UPDATE type::table($table) MERGE $data \
                 WHERE clerk_id = $clerk_id AND role = $role RETURN AFTER",
            )
            .bind(("table", TABLE))
            .bind(("data", profile))
            .bind(("clerk_id", clerk_id.to_string()))
            .bind(("role", role))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let deleted: Option<User> = self.base.db().delete(record_id(TABLE, id)).await?;
        Ok(deleted.is_some())
    }
}
