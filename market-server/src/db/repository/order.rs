//! Order Repository
//!
//! All lifecycle transitions (accept, reject, cancel, status) are single
//! conditional updates: the expected current state is part of the `WHERE`
//! clause and `RETURN AFTER` yields the row only when the condition held.
//! An empty result means the precondition failed - the caller re-reads the
//! order to classify the failure. Two concurrent accepts therefore resolve
//! to exactly one winner.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use shared::order::{OrderStatus, RejectedVendor};

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::Order;

const TABLE: &str = "order";

/// `vendor_id` may be NULL (serialized None) or NONE (cleared via SET),
/// so unassigned checks match both.
const UNASSIGNED: &str = "(vendor_id = NONE OR vendor_id = NULL)";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Parse an API path parameter into an order record id
    pub fn id(order_id: &str) -> RecordId {
        record_id(TABLE, order_id)
    }

    /// Total number of orders (seeds the order-number sequence)
    pub async fn count(&self) -> RepoResult<u64> {
        #[derive(Deserialize)]
        struct CountRow {
            count: u64,
        }
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS count FROM type::table($table) GROUP ALL")
            .bind(("table", TABLE))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Persist a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, order_id: &str) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(Self::id(order_id)).await?;
        Ok(order)
    }

    /// Orders placed by a user, newest first
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM type::table($table) WHERE user_id = $user_id ORDER BY created_at DESC")
            .bind(("table", TABLE))
            .bind(("user_id", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders held (now or previously) by a vendor, newest acceptance first
    pub async fn find_by_vendor(&self, vendor_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM type::table($table) WHERE vendor_id = $vendor_id ORDER BY accepted_at DESC")
            .bind(("table", TABLE))
            .bind(("vendor_id", vendor_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Pending, unassigned orders in a pincode
    ///
    /// When a vendor id is given, orders hidden from that vendor are
    /// excluded (the legacy availability route passes no vendor).
    pub async fn find_available(
        &self,
        pincode: &str,
        for_vendor: Option<&str>,
    ) -> RepoResult<Vec<Order>> {
        let mut sql = format!(
            "SELECT * FROM type::table($table) \
             WHERE user_address.pincode = $pincode AND status = 'pending' AND {UNASSIGNED}"
        );
        if for_vendor.is_some() {
            sql.push_str(" AND $vendor_id NOTINSIDE hidden_from_vendors");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("table", TABLE))
            .bind(("pincode", pincode.to_string()));
        if let Some(vendor_id) = for_vendor {
            query = query.bind(("vendor_id", vendor_id.to_string()));
        }

        let orders: Vec<Order> = query.await?.take(0)?;
        Ok(orders)
    }

    /// User-cancelled orders in a pincode (shown to vendors, not acceptable)
    pub async fn find_cancelled_by_user(&self, pincode: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM type::table($table) \
                 WHERE user_address.pincode = $pincode AND status = 'cancelled_by_user' \
                 ORDER BY created_at DESC",
            )
            .bind(("table", TABLE))
            .bind(("pincode", pincode.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Atomically assign a pending, unassigned order to a vendor
    ///
    /// Returns None when the order is missing or no longer available.
    pub async fn try_accept(
        &self,
        order_id: &str,
        vendor_id: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Order>> {
        let sql = format!(
            "UPDATE $order SET vendor_id = $vendor_id, status = 'accepted', \
             accepted_at = $now, updated_at = $now \
             WHERE status = 'pending' AND {UNASSIGNED} RETURN AFTER"
        );
        let orders: Vec<Order> = self
            .base
            .db()
            .query(sql)
            .bind(("order", Self::id(order_id)))
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Atomically release an order back to pending
    ///
    /// Only the holding vendor may release; the refreshed rejection ledger
    /// is written in the same statement. `accepted_at` is cleared together
    /// with `vendor_id` so the assignment invariant never breaks.
    pub async fn try_reject(
        &self,
        order_id: &str,
        vendor_id: &str,
        rejected_vendors: Vec<RejectedVendor>,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "UPDATE $order SET rejected_vendors = $ledger, vendor_id = NONE, \
                 status = 'pending', accepted_at = NONE, updated_at = $now \
                 WHERE vendor_id = $vendor_id AND status != 'pending' RETURN AFTER",
            )
            .bind(("order", Self::id(order_id)))
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("ledger", rejected_vendors))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Set the order status; `completed` also stamps `completed_at`
    pub async fn set_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Order>> {
        let sql = if status == OrderStatus::Completed {
            "UPDATE $order SET status = $status, completed_at = $now, updated_at = $now RETURN AFTER"
        } else {
            "UPDATE $order SET status = $status, updated_at = $now RETURN AFTER"
        };
        let orders: Vec<Order> = self
            .base
            .db()
            .query(sql)
            .bind(("order", Self::id(order_id)))
            .bind(("status", status))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Atomically cancel an order on behalf of its owner
    ///
    /// The owner check and the still-cancellable check are part of the
    /// statement; None means one of them failed (or the order is missing).
    pub async fn try_cancel(
        &self,
        order_id: &str,
        user_id: &str,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "UPDATE $order SET status = 'cancelled_by_user', \
                 cancellation_reason = $reason, cancelled_at = $now, updated_at = $now \
                 WHERE user_id = $user_id AND status IN ['pending', 'accepted', 'in_progress'] \
                 RETURN AFTER",
            )
            .bind(("order", Self::id(order_id)))
            .bind(("user_id", user_id.to_string()))
            .bind(("reason", reason))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }
}
