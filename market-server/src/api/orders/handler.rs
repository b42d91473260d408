//! Order API Handlers
//!
//! Orchestration only: authorization lookups against the profile directory,
//! then a lifecycle call, then response shaping. The state transitions
//! themselves are atomic conditional updates in [`OrderRepository`].

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Serialize;

use shared::order::{CooldownStatus, OrderStatus, lifecycle};

use crate::core::ServerState;
use crate::db::models::{
    Order, OrderCancel, OrderCreate, OrderStatusUpdate, OrderVendorAction, User, UserRole,
};
use crate::db::repository::{OrderRepository, UserRepository};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_list, ok_with_message};

const USER_ONBOARDING: &str = "/onboarding?role=user";
const VENDOR_ONBOARDING: &str = "/onboarding?role=vendor";

/// Order annotated with the placing user's name and wallet (vendor feed)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorOrderView {
    #[serde(flatten)]
    pub order: Order,
    pub user_name: String,
    pub user_wallet_address: Option<String>,
}

/// Order annotated with cooldown info for the requesting vendor
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableOrderView {
    #[serde(flatten)]
    pub order: Order,
    pub user_name: String,
    pub can_accept: bool,
    pub remaining_cooldown: i64,
}

/// Fetch the placing users for a batch of orders in one query
async fn user_lookup(
    users: &UserRepository,
    orders: &[Order],
) -> AppResult<HashMap<String, User>> {
    let mut ids: Vec<String> = orders.iter().map(|o| o.user_id.clone()).collect();
    ids.sort();
    ids.dedup();
    let found = users.find_by_clerk_ids(ids, UserRole::User).await?;
    Ok(found.into_iter().map(|u| (u.clerk_id.clone(), u)).collect())
}

fn display_name_for(order: &Order, users: &HashMap<String, User>) -> String {
    match users.get(&order.user_id) {
        Some(user) => user.display_name(),
        None => User::fallback_name(&order.user_id),
    }
}

/// POST /api/orders - place an order (user checkout)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<AppResponse<Order>>)> {
    if payload.items.is_empty() {
        return Err(AppError::validation("Order must contain at least one item"));
    }
    for item in &payload.items {
        validate_required_text(&item.name, "item name", MAX_NAME_LEN)?;
        if item.price < 0.0 {
            return Err(AppError::validation("Item price must not be negative"));
        }
        if item.quantity <= 0.0 {
            return Err(AppError::validation("Item quantity must be positive"));
        }
    }

    let users = UserRepository::new(state.db.clone());
    let user = users
        .find_by_clerk_id(&payload.user_id, UserRole::User)
        .await?;
    let user = match user {
        Some(u) if u.profile_completed => u,
        _ => {
            return Err(AppError::profile_incomplete(
                "Please complete your profile setup first to place orders",
                USER_ONBOARDING,
            ));
        }
    };
    let Some(address) = user.address.clone() else {
        return Err(AppError::profile_incomplete(
            "Please complete your profile setup first to place orders",
            USER_ONBOARDING,
        ));
    };

    let now = Utc::now();
    let order = Order::create(
        state.order_numbers.next(now),
        payload.user_id,
        user.wallet_address.clone(),
        address,
        payload.items,
        now,
    );

    let order = OrderRepository::new(state.db.clone()).create(order).await?;
    tracing::info!(order_number = %order.order_number, "Order created");

    Ok((
        StatusCode::CREATED,
        ok_with_message(order, "Order created successfully"),
    ))
}

/// GET /api/orders/user/:user_id - orders placed by a user, newest first
pub async fn list_for_user(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = OrderRepository::new(state.db.clone())
        .find_by_user(&user_id)
        .await?;
    Ok(ok_list(orders))
}

/// GET /api/orders/vendor/:vendor_id - orders held by a vendor
///
/// Annotated with the placing user's display name and wallet address.
pub async fn list_for_vendor(
    State(state): State<ServerState>,
    Path(vendor_id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<VendorOrderView>>>> {
    let orders = OrderRepository::new(state.db.clone())
        .find_by_vendor(&vendor_id)
        .await?;

    let users = UserRepository::new(state.db.clone());
    let lookup = user_lookup(&users, &orders).await?;

    let views = orders
        .into_iter()
        .map(|order| {
            let user_name = display_name_for(&order, &lookup);
            let user_wallet_address = lookup
                .get(&order.user_id)
                .and_then(|u| u.wallet_address.clone());
            VendorOrderView {
                order,
                user_name,
                user_wallet_address,
            }
        })
        .collect();
    Ok(ok_list(views))
}

/// GET /api/orders/available/:pincode/:vendor_id - availability feed
///
/// Pending unassigned orders in the pincode (excluding ones hidden from
/// this vendor), plus user-cancelled orders in the area. Every entry
/// carries the cooldown annotation for the requesting vendor; cancelled
/// entries are never acceptable.
pub async fn list_available(
    State(state): State<ServerState>,
    Path((pincode, vendor_id)): Path<(String, String)>,
) -> AppResult<Json<AppResponse<Vec<AvailableOrderView>>>> {
    let repo = OrderRepository::new(state.db.clone());
    let mut orders = repo.find_available(&pincode, Some(&vendor_id)).await?;
    orders.extend(repo.find_cancelled_by_user(&pincode).await?);

    let users = UserRepository::new(state.db.clone());
    let lookup = user_lookup(&users, &orders).await?;

    let now = Utc::now();
    let views = orders
        .into_iter()
        .map(|order| {
            let cooldown = if order.status == OrderStatus::Pending {
                lifecycle::vendor_cooldown(&order.rejected_vendors, &vendor_id, now)
            } else {
                CooldownStatus::blocked(0)
            };
            let user_name = display_name_for(&order, &lookup);
            AvailableOrderView {
                order,
                user_name,
                can_accept: cooldown.can_accept,
                remaining_cooldown: cooldown.remaining_seconds,
            }
        })
        .collect();
    Ok(ok_list(views))
}

/// GET /api/orders/available/:pincode - legacy feed without cooldown info
pub async fn list_available_legacy(
    State(state): State<ServerState>,
    Path(pincode): Path<String>,
) -> AppResult<Json<AppResponse<Vec<VendorOrderView>>>> {
    let orders = OrderRepository::new(state.db.clone())
        .find_available(&pincode, None)
        .await?;

    let users = UserRepository::new(state.db.clone());
    let lookup = user_lookup(&users, &orders).await?;

    let views = orders
        .into_iter()
        .map(|order| {
            let user_name = display_name_for(&order, &lookup);
            VendorOrderView {
                order,
                user_name,
                user_wallet_address: None,
            }
        })
        .collect();
    Ok(ok_list(views))
}

/// PUT /api/orders/:id/accept - vendor takes a pending order
pub async fn accept(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<OrderVendorAction>,
) -> AppResult<Json<AppResponse<Order>>> {
    let users = UserRepository::new(state.db.clone());
    let vendor = users
        .find_by_clerk_id(&payload.vendor_id, UserRole::Vendor)
        .await?;
    let vendor = match vendor {
        Some(v) if v.profile_completed => v,
        _ => {
            return Err(AppError::profile_incomplete(
                "Please complete your vendor profile first",
                VENDOR_ONBOARDING,
            ));
        }
    };
    if !vendor.has_complete_vendor_credentials() {
        return Err(AppError::profile_incomplete(
            "Please complete your business information (business name and GSTIN) first",
            VENDOR_ONBOARDING,
        ));
    }

    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    if order.status != OrderStatus::Pending || order.vendor_id.is_some() {
        return Err(AppError::conflict("Order is no longer available"));
    }

    let now = Utc::now();
    let cooldown = lifecycle::vendor_cooldown(&order.rejected_vendors, &payload.vendor_id, now);
    if !cooldown.can_accept {
        return Err(AppError::cooldown(cooldown.remaining_seconds));
    }

    // Atomic claim: only one concurrent accept can pass the WHERE clause
    match repo.try_accept(&order_id, &payload.vendor_id, now).await? {
        Some(order) => {
            tracing::info!(
                order_number = %order.order_number,
                vendor_id = %payload.vendor_id,
                "Order accepted"
            );
            Ok(ok_with_message(order, "Order accepted successfully"))
        }
        None => match repo.find_by_id(&order_id).await? {
            Some(_) => Err(AppError::conflict("Order is no longer available")),
            None => Err(AppError::not_found("Order not found")),
        },
    }
}

/// PUT /api/orders/:id/reject - holding vendor backs out
///
/// Resets the order to pending, clears the vendor and refreshes the
/// rejection ledger entry, all in a single conditional update.
pub async fn reject(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<OrderVendorAction>,
) -> AppResult<Json<AppResponse<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    if order.vendor_id.as_deref() != Some(payload.vendor_id.as_str())
        || order.status == OrderStatus::Pending
    {
        return Err(AppError::forbidden(
            "You can only reject orders you have accepted",
        ));
    }

    let now = Utc::now();
    let mut ledger = order.rejected_vendors.clone();
    lifecycle::record_rejection(&mut ledger, &payload.vendor_id, now);

    match repo
        .try_reject(&order_id, &payload.vendor_id, ledger, now)
        .await?
    {
        Some(order) => {
            tracing::info!(
                order_number = %order.order_number,
                vendor_id = %payload.vendor_id,
                "Order rejected, back to pending"
            );
            Ok(ok_with_message(
                order,
                "Order rejected successfully. You can accept this order again after 10 minutes.",
            ))
        }
        None => Err(AppError::conflict("Order state changed, please retry")),
    }
}

/// PUT /api/orders/:id/status - set the order status
///
/// Deliberately permissive about which transition is requested (matches
/// observed product behavior); `completed` stamps `completed_at`.
pub async fn update_status(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    match repo.set_status(&order_id, payload.status, Utc::now()).await? {
        Some(order) => Ok(ok_with_message(order, "Order status updated successfully")),
        None => Err(AppError::not_found("Order not found")),
    }
}

/// PUT /api/orders/:id/cancel - placing user cancels
pub async fn cancel(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<OrderCancel>,
) -> AppResult<Json<AppResponse<Order>>> {
    if let Some(reason) = &payload.reason {
        if reason.len() > MAX_NOTE_LEN {
            return Err(AppError::validation("Cancellation reason is too long"));
        }
    }

    let repo = OrderRepository::new(state.db.clone());
    let now = Utc::now();
    match repo
        .try_cancel(&order_id, &payload.user_id, payload.reason.clone(), now)
        .await?
    {
        Some(order) => {
            tracing::info!(order_number = %order.order_number, "Order cancelled by user");
            Ok(ok_with_message(order, "Order cancelled successfully"))
        }
        // Condition failed: classify against the current row
        None => match repo.find_by_id(&order_id).await? {
            None => Err(AppError::not_found("Order not found")),
            Some(order) if order.user_id != payload.user_id => {
                Err(AppError::forbidden("You can only cancel your own orders"))
            }
            Some(_) => Err(AppError::conflict(
                "Cannot cancel order that is already completed or cancelled",
            )),
        },
    }
}

/// GET /api/orders/:id - single order
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = OrderRepository::new(state.db.clone())
        .find_by_id(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    Ok(ok(order))
}
