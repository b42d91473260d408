//! User Model
//!
//! Role-scoped profiles: the same person may hold both a `user` and a
//! `vendor` profile under one external identity. (clerk_id, role) is unique.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use shared::order::OrderAddress;

use super::serde_helpers;
use crate::utils::validation::is_valid_gstin;

/// Profile role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Vendor,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Vendor => "vendor",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile matching the `user` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// External identity reference
    pub clerk_id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<OrderAddress>,
    // Vendor-only fields
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub wallet_reminder_dismissed: bool,
    #[serde(default)]
    pub profile_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Human-readable name for order annotations
    ///
    /// Falls back to the username, then to the identity suffix, so a vendor
    /// dashboard never shows an empty name.
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        if !self.username.is_empty() {
            return self.username.clone();
        }
        Self::fallback_name(&self.clerk_id)
    }

    /// "User {last 4 of the identity}" - used when no profile fields are
    /// usable, and for orders whose placing profile no longer exists
    pub fn fallback_name(clerk_id: &str) -> String {
        let suffix: String = clerk_id
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("User {}", suffix)
    }

    /// Vendor acceptance eligibility
    ///
    /// A vendor may accept orders only with a completed profile, a non-empty
    /// business name and a GSTIN in the 15-char uppercase alphanumeric
    /// format. Single call site for the rule - the handlers never repeat
    /// these field checks.
    pub fn has_complete_vendor_credentials(&self) -> bool {
        if self.role != UserRole::Vendor || !self.profile_completed {
            return false;
        }
        let has_business = self
            .business_name
            .as_deref()
            .is_some_and(|b| !b.trim().is_empty());
        let has_gstin = self
            .gstin
            .as_deref()
            .is_some_and(|g| !g.trim().is_empty() && is_valid_gstin(g.trim()));
        has_business && has_gstin
    }
}

/// Direct creation payload (admin/API use)
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub clerk_id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<String>,
}

/// Partial update payload (merge semantics)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_reminder_dismissed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor(business: Option<&str>, gstin: Option<&str>, completed: bool) -> User {
        User {
            id: None,
            clerk_id: "clerk_vendor_1".to_string(),
            username: "scrapco".to_string(),
            email: "ops@scrapco.example".to_string(),
            first_name: None,
            last_name: None,
            role: UserRole::Vendor,
            phone_number: None,
            address: None,
            business_name: business.map(String::from),
            gstin: gstin.map(String::from),
            wallet_address: None,
            wallet_reminder_dismissed: false,
            profile_completed: completed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_vendor_credentials_complete() {
        let v = vendor(Some("ScrapCo"), Some("29ABCDE1234F1Z5"), true);
        assert!(v.has_complete_vendor_credentials());
    }

    #[test]
    fn test_vendor_credentials_missing_pieces() {
        assert!(!vendor(None, Some("29ABCDE1234F1Z5"), true).has_complete_vendor_credentials());
        assert!(!vendor(Some("  "), Some("29ABCDE1234F1Z5"), true).has_complete_vendor_credentials());
        assert!(!vendor(Some("ScrapCo"), None, true).has_complete_vendor_credentials());
        assert!(!vendor(Some("ScrapCo"), Some("bad"), true).has_complete_vendor_credentials());
        assert!(!vendor(Some("ScrapCo"), Some("29ABCDE1234F1Z5"), false).has_complete_vendor_credentials());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut v = vendor(None, None, false);
        v.first_name = Some("Asha".to_string());
        v.last_name = Some("Rao".to_string());
        assert_eq!(v.display_name(), "Asha Rao");

        v.first_name = None;
        v.last_name = None;
        assert_eq!(v.display_name(), "scrapco");

        v.username = String::new();
        assert_eq!(v.display_name(), "User or_1");
    }

    #[test]
    fn test_fallback_name_takes_identity_suffix() {
        assert_eq!(User::fallback_name("clerk_vendor_1"), "User or_1");
        assert_eq!(User::fallback_name("ab"), "User ab");
    }
}
