//! Onboarding API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{User, UserRole};
use crate::db::repository::UserRepository;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, is_valid_gstin, is_valid_pincode, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct CompleteProfileRequest {
    pub clerk_id: String,
    pub role: UserRole,
    pub full_address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// POST /api/onboarding/complete-profile
///
/// Validates the address (6-digit pincode) and, for vendors, the business
/// name and optional GSTIN (stored uppercased). Sets `profile_completed`.
pub async fn complete_profile(
    State(state): State<ServerState>,
    Json(payload): Json<CompleteProfileRequest>,
) -> AppResult<Json<AppResponse<User>>> {
    validate_required_text(&payload.clerk_id, "clerk_id", MAX_NAME_LEN)?;
    validate_required_text(&payload.full_address, "full_address", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.city, "city", MAX_NAME_LEN)?;
    validate_required_text(&payload.state, "state", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone_number, "phone_number", MAX_NAME_LEN)?;

    if !is_valid_pincode(&payload.pincode) {
        return Err(AppError::validation("Pincode must be exactly 6 digits"));
    }

    let mut gstin = None;
    if payload.role == UserRole::Vendor {
        let business = payload.business_name.as_deref().unwrap_or("").trim();
        if business.is_empty() {
            return Err(AppError::validation("Business name is required for vendors"));
        }
        if let Some(g) = payload.gstin.as_deref().map(str::trim) {
            if !g.is_empty() {
                let upper = g.to_uppercase();
                if !is_valid_gstin(&upper) {
                    return Err(AppError::validation(
                        "GSTIN must be exactly 15 characters (letters and numbers only)",
                    ));
                }
                gstin = Some(upper);
            }
        }
    }

    let mut update = serde_json::json!({
        "address": {
            "full_address": payload.full_address,
            "city": payload.city,
            "state": payload.state,
            "pincode": payload.pincode,
        },
        "profile_completed": true,
        "updated_at": chrono::Utc::now(),
    });
    if let Some(phone) = &payload.phone_number {
        update["phone_number"] = serde_json::json!(phone);
    }
    if payload.role == UserRole::Vendor {
        update["business_name"] = serde_json::json!(payload.business_name);
        if let Some(g) = &gstin {
            update["gstin"] = serde_json::json!(g);
        }
    }

    let user = UserRepository::new(state.db.clone())
        .complete_profile(&payload.clerk_id, payload.role, update)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(ok_with_message(user, "Profile completed successfully"))
}

/// Check-profile response: effective completion plus the profile itself
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckProfileResponse {
    pub success: bool,
    pub profile_completed: bool,
    pub user: User,
}

/// GET /api/onboarding/check-profile/:clerk_id/:role
///
/// Vendors are re-checked against the stored fields: a missing business
/// name or malformed GSTIN downgrades the stored completion flag.
pub async fn check_profile(
    State(state): State<ServerState>,
    Path((clerk_id, role)): Path<(String, UserRole)>,
) -> AppResult<Json<CheckProfileResponse>> {
    let user = UserRepository::new(state.db.clone())
        .find_by_clerk_id(&clerk_id, role)
        .await?
        .ok_or_else(|| AppError::not_found("User profile not found for this role"))?;

    let mut profile_completed = user.profile_completed;
    if role == UserRole::Vendor && profile_completed {
        let has_business = user
            .business_name
            .as_deref()
            .is_some_and(|b| !b.trim().is_empty());
        // GSTIN stays optional here; only a malformed value downgrades
        let gstin_ok = match user.gstin.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(g) => is_valid_gstin(g),
        };
        if !has_business || !gstin_ok {
            tracing::warn!(clerk_id = %clerk_id, "Vendor profile flagged complete but invalid");
            profile_completed = false;
        }
    }

    Ok(Json(CheckProfileResponse {
        success: true,
        profile_completed,
        user,
    }))
}
