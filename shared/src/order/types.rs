//! Shared order types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status
///
/// Normal flow: `Pending -> Accepted -> InProgress -> PaymentPending -> Completed`.
///
/// A vendor rejection is not a state of its own: it resets an assigned order
/// back to [`Pending`](OrderStatus::Pending) and clears the vendor.
/// `Cancelled` / `CancelledByUser` are terminal branches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    InProgress,
    PaymentPending,
    Completed,
    Cancelled,
    CancelledByUser,
}

impl OrderStatus {
    /// Terminal states - no further transition is allowed
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Cancelled | OrderStatus::CancelledByUser
        )
    }

    /// States in which the placing user may still cancel
    pub fn is_cancellable(self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Accepted | OrderStatus::InProgress
        )
    }

    /// States that require a holding vendor
    ///
    /// Invariant: `vendor_id.is_some()` exactly when the status is assigned.
    pub fn is_assigned(self) -> bool {
        matches!(
            self,
            OrderStatus::Accepted
                | OrderStatus::InProgress
                | OrderStatus::PaymentPending
                | OrderStatus::Completed
        )
    }

    /// Lowercase wire name (matches the serde representation)
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::PaymentPending => "payment_pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::CancelledByUser => "cancelled_by_user",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address snapshot copied onto the order at creation time
///
/// Later edits to the user's profile address must not retroactively change
/// past orders, so this is a value copy, not a reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderAddress {
    pub full_address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// Order line item
///
/// `total` is fixed at creation (`price * quantity`) and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: f64,
    pub unit: String,
    pub total: f64,
}

/// Line item as submitted by the client (totals are computed server-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: f64,
    pub unit: Option<String>,
}

impl OrderItemInput {
    /// Build the persisted line item, enforcing `total = price * quantity`
    pub fn into_item(self) -> OrderItem {
        OrderItem {
            id: self.id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            unit: self.unit.unwrap_or_else(|| "kg".to_string()),
            total: self.price * self.quantity,
        }
    }
}

/// Rejection ledger entry
///
/// At most one entry per vendor; re-rejecting replaces the entry so the
/// cooldown always measures from the latest rejection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectedVendor {
    pub vendor_id: String,
    pub rejected_at: DateTime<Utc>,
}
