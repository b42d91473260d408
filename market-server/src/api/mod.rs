//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单生命周期接口 (核心)
//! - [`users`] - 用户档案接口
//! - [`onboarding`] - 档案完善接口
//! - [`scrap_items`] - 废品目录接口

pub mod health;
pub mod onboarding;
pub mod orders;
pub mod scrap_items;
pub mod users;

use axum::Router;

use crate::core::ServerState;

/// Assemble the full API router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(users::router())
        .merge(onboarding::router())
        .merge(scrap_items::router())
}
