//! Shared domain types for the scrap-collection marketplace
//!
//! This crate holds everything the order lifecycle needs that is independent
//! of the web framework and the database:
//!
//! - [`order::OrderStatus`] - order state machine
//! - [`order::lifecycle`] - cooldown rule and rejection ledger
//! - [`order::OrderNumberGenerator`] - process-unique order numbers

pub mod order;

pub use order::{
    CooldownStatus, OrderAddress, OrderItem, OrderItemInput, OrderNumberGenerator, OrderStatus,
    RejectedVendor,
};
