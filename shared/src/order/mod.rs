//! Order domain module
//!
//! Status machine, cooldown policy and order-number generation.

pub mod lifecycle;
mod number;
mod types;

pub use lifecycle::{CooldownStatus, REJECTION_COOLDOWN_MS};
pub use number::OrderNumberGenerator;
pub use types::{OrderAddress, OrderItem, OrderItemInput, OrderStatus, RejectedVendor};
