//! Onboarding API 模块
//!
//! Profile completion for role-scoped user records. Order placement and
//! vendor acceptance both gate on the flags set here.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/onboarding", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/complete-profile", post(handler::complete_profile))
        .route(
            "/check-profile/{clerk_id}/{role}",
            get(handler::check_profile),
        )
}
