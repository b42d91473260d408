//! Input validation helpers
//!
//! Centralized text limits and format checks used by the CRUD handlers.

use crate::utils::AppError;

// ========== Text Length Limits ==========

/// Entity names: scrap item, business, username, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes and reasons (cancellation reason, item description)
pub const MAX_NOTE_LEN: usize = 500;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ========== Validation Helpers ==========

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        if v.len() > max_len {
            return Err(AppError::validation(format!(
                "{field} is too long ({} chars, max {max_len})",
                v.len()
            )));
        }
    }
    Ok(())
}

/// Postal pincode: exactly 6 digits
pub fn is_valid_pincode(pincode: &str) -> bool {
    pincode.len() == 6 && pincode.bytes().all(|b| b.is_ascii_digit())
}

/// GSTIN format: exactly 15 uppercase alphanumeric characters
pub fn is_valid_gstin(gstin: &str) -> bool {
    gstin.len() == 15
        && gstin
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pincode_format() {
        assert!(is_valid_pincode("560001"));
        assert!(!is_valid_pincode("56001"));
        assert!(!is_valid_pincode("5600011"));
        assert!(!is_valid_pincode("56000a"));
    }

    #[test]
    fn test_gstin_format() {
        assert!(is_valid_gstin("29ABCDE1234F1Z5"));
        assert!(!is_valid_gstin("29abcde1234f1z5"), "lowercase rejected");
        assert!(!is_valid_gstin("29ABCDE1234F1Z"), "too short");
        assert!(!is_valid_gstin("29ABCDE1234F1Z55"), "too long");
        assert!(!is_valid_gstin("29ABCDE1234F1Z-"), "symbols rejected");
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Copper", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }
}
