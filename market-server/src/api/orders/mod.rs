//! Order API Module
//!
//! The lifecycle surface: checkout, vendor acceptance/rejection with the
//! cooldown rule, status updates, user cancellation and the availability
//! feed.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/user/{user_id}", get(handler::list_for_user))
        .route("/vendor/{vendor_id}", get(handler::list_for_vendor))
        .route(
            "/available/{pincode}/{vendor_id}",
            get(handler::list_available),
        )
        // Legacy availability feed without cooldown annotation
        .route("/available/{pincode}", get(handler::list_available_legacy))
        .route("/{id}/accept", put(handler::accept))
        .route("/{id}/reject", put(handler::reject))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/cancel", put(handler::cancel))
        .route("/{id}", get(handler::get_by_id))
}
