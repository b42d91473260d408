//! Database models matching the SurrealDB tables

pub mod order;
pub mod scrap_item;
pub mod serde_helpers;
pub mod user;

pub use order::{Order, OrderCancel, OrderCreate, OrderStatusUpdate, OrderVendorAction};
pub use scrap_item::{ScrapCategory, ScrapItem, ScrapItemCreate, ScrapItemUpdate};
pub use user::{User, UserCreate, UserRole, UserUpdate};
