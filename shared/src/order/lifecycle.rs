//! Order lifecycle rules
//!
//! The vendor-rejection cooldown and the rejection ledger. Both are pure
//! functions over the order's `rejected_vendors` list; `now` is always
//! passed in so the rules are testable without a clock.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::RejectedVendor;

/// Cooldown window after a vendor rejects an order (10 minutes)
pub const REJECTION_COOLDOWN_MS: i64 = 600_000;

/// Result of the cooldown check for one (order, vendor) pair
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CooldownStatus {
    pub can_accept: bool,
    /// Seconds until the vendor may accept again (0 when allowed)
    pub remaining_seconds: i64,
}

impl CooldownStatus {
    pub fn allowed() -> Self {
        Self {
            can_accept: true,
            remaining_seconds: 0,
        }
    }

    pub fn blocked(remaining_seconds: i64) -> Self {
        Self {
            can_accept: false,
            remaining_seconds,
        }
    }
}

/// Check whether a vendor may accept an order given its rejection ledger
///
/// A vendor with no ledger entry may accept immediately. Otherwise the
/// vendor is blocked for [`REJECTION_COOLDOWN_MS`] after their latest
/// rejection; the remaining wait is rounded up to whole seconds so a UI
/// can render a countdown. The cooldown is scoped to this order and this
/// vendor - other vendors are unaffected.
pub fn vendor_cooldown(
    rejected_vendors: &[RejectedVendor],
    vendor_id: &str,
    now: DateTime<Utc>,
) -> CooldownStatus {
    let Some(entry) = rejected_vendors.iter().find(|r| r.vendor_id == vendor_id) else {
        return CooldownStatus::allowed();
    };

    let elapsed_ms = now
        .signed_duration_since(entry.rejected_at)
        .num_milliseconds();
    if elapsed_ms >= REJECTION_COOLDOWN_MS {
        return CooldownStatus::allowed();
    }

    // Round up: 0 < remaining_ms < REJECTION_COOLDOWN_MS here
    let remaining_ms = REJECTION_COOLDOWN_MS - elapsed_ms;
    CooldownStatus::blocked((remaining_ms + 999) / 1000)
}

/// Record a rejection in the ledger
///
/// Any previous entry for the same vendor is removed first, so the ledger
/// stays unique per vendor and the cooldown restarts from `now`.
pub fn record_rejection(
    rejected_vendors: &mut Vec<RejectedVendor>,
    vendor_id: &str,
    now: DateTime<Utc>,
) {
    rejected_vendors.retain(|r| r.vendor_id != vendor_id);
    rejected_vendors.push(RejectedVendor {
        vendor_id: vendor_id.to_string(),
        rejected_at: now,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ledger_with(vendor_id: &str, rejected_at: DateTime<Utc>) -> Vec<RejectedVendor> {
        vec![RejectedVendor {
            vendor_id: vendor_id.to_string(),
            rejected_at,
        }]
    }

    #[test]
    fn test_unknown_vendor_can_accept_immediately() {
        let now = Utc::now();
        let ledger = ledger_with("vendor-a", now);
        let status = vendor_cooldown(&ledger, "vendor-b", now);
        assert!(status.can_accept);
        assert_eq!(status.remaining_seconds, 0);
    }

    #[test]
    fn test_vendor_blocked_right_after_rejection() {
        let now = Utc::now();
        let ledger = ledger_with("vendor-a", now);
        let status = vendor_cooldown(&ledger, "vendor-a", now);
        assert!(!status.can_accept);
        assert_eq!(status.remaining_seconds, 600);
    }

    #[test]
    fn test_remaining_seconds_rounds_up() {
        let rejected_at = Utc::now();
        let ledger = ledger_with("vendor-a", rejected_at);
        // 0.5s before expiry -> 1 remaining second, not 0
        let now = rejected_at + Duration::milliseconds(REJECTION_COOLDOWN_MS - 500);
        let status = vendor_cooldown(&ledger, "vendor-a", now);
        assert!(!status.can_accept);
        assert_eq!(status.remaining_seconds, 1);
    }

    #[test]
    fn test_remaining_seconds_partial_second_boundaries() {
        let rejected_at = Utc::now();
        let ledger = ledger_with("vendor-a", rejected_at);
        // 1.5s left -> 2, exactly 2s left -> 2
        let now = rejected_at + Duration::milliseconds(REJECTION_COOLDOWN_MS - 1500);
        assert_eq!(vendor_cooldown(&ledger, "vendor-a", now).remaining_seconds, 2);
        let now = rejected_at + Duration::milliseconds(REJECTION_COOLDOWN_MS - 2000);
        assert_eq!(vendor_cooldown(&ledger, "vendor-a", now).remaining_seconds, 2);
    }

    #[test]
    fn test_vendor_allowed_exactly_at_window_end() {
        let rejected_at = Utc::now();
        let ledger = ledger_with("vendor-a", rejected_at);
        let now = rejected_at + Duration::milliseconds(REJECTION_COOLDOWN_MS);
        let status = vendor_cooldown(&ledger, "vendor-a", now);
        assert!(status.can_accept);
        assert_eq!(status.remaining_seconds, 0);
    }

    #[test]
    fn test_vendor_blocked_just_before_window_end() {
        let rejected_at = Utc::now();
        let ledger = ledger_with("vendor-a", rejected_at);
        let now = rejected_at + Duration::milliseconds(REJECTION_COOLDOWN_MS - 1);
        let status = vendor_cooldown(&ledger, "vendor-a", now);
        assert!(!status.can_accept);
        assert_eq!(status.remaining_seconds, 1);
    }

    #[test]
    fn test_re_rejection_resets_the_window() {
        let first = Utc::now();
        let mut ledger = ledger_with("vendor-a", first);

        // Window almost over, then the vendor rejects again
        let second = first + Duration::milliseconds(REJECTION_COOLDOWN_MS - 1000);
        record_rejection(&mut ledger, "vendor-a", second);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].rejected_at, second);

        let now = first + Duration::milliseconds(REJECTION_COOLDOWN_MS);
        let status = vendor_cooldown(&ledger, "vendor-a", now);
        assert!(!status.can_accept, "window must restart at the re-rejection");
    }

    #[test]
    fn test_ledger_keeps_one_entry_per_vendor() {
        let now = Utc::now();
        let mut ledger = Vec::new();
        record_rejection(&mut ledger, "vendor-a", now);
        record_rejection(&mut ledger, "vendor-b", now);
        record_rejection(&mut ledger, "vendor-a", now + Duration::seconds(5));
        assert_eq!(ledger.len(), 2);
        let a = ledger.iter().find(|r| r.vendor_id == "vendor-a").unwrap();
        assert_eq!(a.rejected_at, now + Duration::seconds(5));
    }
}
