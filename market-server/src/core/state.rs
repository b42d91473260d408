use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::order::OrderNumberGenerator;

use crate::core::Config;
use crate::db;
use crate::db::repository::OrderRepository;
use crate::utils::AppError;

/// 服务器状态 - 持有所有共享组件
///
/// Cheap to clone: the database handle is reference-counted and the order
/// number generator sits behind an `Arc`.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 订单序号生成器 (进程内唯一)
    pub order_numbers: Arc<OrderNumberGenerator>,
}

impl ServerState {
    /// 初始化服务器状态：打开数据库并播种订单序号
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_path = format!("{}/market.db", config.work_dir);
        let db = db::connect(&db_path).await?;
        Self::with_db(config.clone(), db).await
    }

    /// Build state on top of an already-connected database
    ///
    /// Integration tests use this with the in-memory engine.
    pub async fn with_db(config: Config, db: Surreal<Db>) -> Result<Self, AppError> {
        let existing = OrderRepository::new(db.clone())
            .count()
            .await
            .map_err(|e| AppError::database(format!("Failed to seed order sequence: {e}")))?;
        tracing::info!(existing_orders = existing, "Order sequence seeded");

        Ok(Self {
            config,
            db,
            order_numbers: Arc::new(OrderNumberGenerator::new(existing)),
        })
    }
}
