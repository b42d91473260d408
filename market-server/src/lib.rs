//! Market Server - scrap-collection marketplace backend
//!
//! # 架构概述
//!
//! REST API over an embedded SurrealDB store. The heart of the service is
//! the order lifecycle: vendor acceptance, the per-vendor rejection
//! cooldown, and the guarded status transitions.
//!
//! # 模块结构
//!
//! ```text
//! market-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (models + repositories)
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

/// Load .env and initialize logging. Call once at process start.
pub fn setup_environment() {
    dotenv::dotenv().ok();
    utils::logger::init_logger();
}
