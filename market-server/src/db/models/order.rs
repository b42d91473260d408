//! Order Model
//!
//! The central entity: one pickup request placed by a user, optionally held
//! by a vendor. Items and the address are value snapshots taken at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use shared::order::{OrderAddress, OrderItem, OrderItemInput, OrderStatus, RejectedVendor};

use super::serde_helpers;

/// Order entity matching the `order` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Unique human-readable identifier, immutable after creation
    pub order_number: String,
    /// External identity of the placing user
    pub user_id: String,
    /// Holding vendor; None exactly while the order is unassigned
    #[serde(default)]
    pub vendor_id: Option<String>,
    /// Wallet snapshot of the placing user at creation time
    #[serde(default)]
    pub user_wallet_address: Option<String>,
    /// Address snapshot of the placing user at creation time
    pub user_address: OrderAddress,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub total_items: f64,
    pub status: OrderStatus,
    /// Rejection ledger, unique per vendor (cooldown source)
    #[serde(default)]
    pub rejected_vendors: Vec<RejectedVendor>,
    /// Vendors this order is not offered to
    #[serde(default)]
    pub hidden_from_vendors: Vec<String>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a new pending order from a checkout request
    ///
    /// Line totals and the aggregates are computed here, not taken from the
    /// client: `total = price * quantity` per item, summed into
    /// `total_amount` / `total_items`.
    pub fn create(
        order_number: String,
        user_id: String,
        user_wallet_address: Option<String>,
        user_address: OrderAddress,
        items: Vec<OrderItemInput>,
        now: DateTime<Utc>,
    ) -> Self {
        let items: Vec<OrderItem> = items.into_iter().map(OrderItemInput::into_item).collect();
        let total_amount = items.iter().map(|i| i.total).sum();
        let total_items = items.iter().map(|i| i.quantity).sum();

        Self {
            id: None,
            order_number,
            user_id,
            vendor_id: None,
            user_wallet_address,
            user_address,
            items,
            total_amount,
            total_items,
            status: OrderStatus::Pending,
            rejected_vendors: Vec::new(),
            hidden_from_vendors: Vec::new(),
            cancellation_reason: None,
            cancelled_at: None,
            accepted_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Checkout request body
///
/// The client's `total_amount` / `total_items` are accepted for wire
/// compatibility but ignored; aggregates are recomputed server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub user_id: String,
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub total_items: Option<f64>,
}

/// Body of `PUT /api/orders/{id}/accept` and `/reject`
#[derive(Debug, Clone, Deserialize)]
pub struct OrderVendorAction {
    pub vendor_id: String,
}

/// Body of `PUT /api/orders/{id}/status`
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Body of `PUT /api/orders/{id}/cancel`
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCancel {
    pub user_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> OrderAddress {
        OrderAddress {
            full_address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
        }
    }

    #[test]
    fn test_create_computes_totals() {
        let order = Order::create(
            "ORD000001-0001".to_string(),
            "user_1".to_string(),
            None,
            address(),
            vec![
                OrderItemInput {
                    id: 1,
                    name: "Newspaper".to_string(),
                    price: 10.0,
                    quantity: 2.0,
                    unit: None,
                },
                OrderItemInput {
                    id: 2,
                    name: "Copper".to_string(),
                    price: 400.0,
                    quantity: 0.5,
                    unit: Some("kg".to_string()),
                },
            ],
            Utc::now(),
        );

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.vendor_id.is_none());
        assert_eq!(order.items[0].total, 20.0);
        assert_eq!(order.items[1].total, 200.0);
        assert_eq!(order.total_amount, 220.0);
        assert_eq!(order.total_items, 2.5);
        assert!(order.accepted_at.is_none());
        assert!(order.rejected_vendors.is_empty());
    }
}
