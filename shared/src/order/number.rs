//! Order number generation
//!
//! Numbers look like `ORD000042-3817`: a zero-padded sequence plus the last
//! four digits of the creation timestamp in milliseconds. The sequence is an
//! `AtomicU64` seeded from the store count at startup, so numbers are unique
//! within a process lifetime even when orders are created back to back.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct OrderNumberGenerator {
    sequence: AtomicU64,
}

impl OrderNumberGenerator {
    /// Seed with the number of orders already in the store
    pub fn new(existing_orders: u64) -> Self {
        Self {
            sequence: AtomicU64::new(existing_orders),
        }
    }

    /// Next order number
    pub fn next(&self, now: DateTime<Utc>) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let suffix = now.timestamp_millis().rem_euclid(10_000);
        format!("ORD{:06}-{:04}", seq, suffix)
    }
}
