//! API surface integration tests
//!
//! Availability feeds, profile directory, onboarding and the scrap
//! catalog, exercised through the real router.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, place_order, request, seed_user, seed_vendor, test_state};

#[tokio::test]
async fn health_reports_environment() {
    let state = test_state().await;
    let app = app(&state);

    let (status, body) = request(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["environment"], "development");
}

#[tokio::test]
async fn availability_feed_is_scoped_to_pincode() {
    let state = test_state().await;
    seed_user(&state, "user_blr", "560001").await;
    seed_user(&state, "user_del", "110001").await;
    seed_vendor(&state, "vendor_a", true).await;
    let app = app(&state);

    place_order(&app, "user_blr").await;
    place_order(&app, "user_del").await;

    let (status, body) = request(&app, "GET", "/api/orders/available/560001/vendor_a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    let entry = &body["data"][0];
    assert_eq!(entry["user_address"]["pincode"], "560001");
    assert_eq!(entry["canAccept"], true);
    assert_eq!(entry["remainingCooldown"], 0);
    assert_eq!(entry["userName"], "Test User");
}

#[tokio::test]
async fn availability_feed_annotates_cooldown_and_cancellations() {
    let state = test_state().await;
    seed_user(&state, "user_1", "560001").await;
    seed_vendor(&state, "vendor_a", true).await;
    let app = app(&state);

    // First order: accepted then rejected by vendor_a, so it is back in
    // the feed but locked behind the cooldown for this vendor
    let rejected_id = place_order(&app, "user_1").await;
    request(
        &app,
        "PUT",
        &format!("/api/orders/{rejected_id}/accept"),
        Some(json!({ "vendor_id": "vendor_a" })),
    )
    .await;
    request(
        &app,
        "PUT",
        &format!("/api/orders/{rejected_id}/reject"),
        Some(json!({ "vendor_id": "vendor_a" })),
    )
    .await;

    // Second order: cancelled by the user, still listed but never acceptable
    let cancelled_id = place_order(&app, "user_1").await;
    request(
        &app,
        "PUT",
        &format!("/api/orders/{cancelled_id}/cancel"),
        Some(json!({ "user_id": "user_1" })),
    )
    .await;

    let (status, body) = request(&app, "GET", "/api/orders/available/560001/vendor_a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let entries = body["data"].as_array().unwrap();
    let rejected = entries
        .iter()
        .find(|e| e["status"] == "pending")
        .expect("rejected order back in feed");
    assert_eq!(rejected["canAccept"], false);
    assert!(rejected["remainingCooldown"].as_i64().unwrap() > 0);

    let cancelled = entries
        .iter()
        .find(|e| e["status"] == "cancelled_by_user")
        .expect("cancelled order listed");
    assert_eq!(cancelled["canAccept"], false);
    assert_eq!(cancelled["remainingCooldown"], 0);

    // A different vendor sees the pending order as immediately acceptable
    seed_vendor(&state, "vendor_b", true).await;
    let (_, body) = request(&app, "GET", "/api/orders/available/560001/vendor_b", None).await;
    let entries = body["data"].as_array().unwrap();
    let pending = entries.iter().find(|e| e["status"] == "pending").unwrap();
    assert_eq!(pending["canAccept"], true);
}

#[tokio::test]
async fn availability_feed_excludes_orders_hidden_from_vendor() {
    let state = test_state().await;
    seed_user(&state, "user_1", "560001").await;
    seed_vendor(&state, "vendor_a", true).await;
    seed_vendor(&state, "vendor_b", true).await;
    let app = app(&state);
    let order_id = place_order(&app, "user_1").await;

    state
        .db
        .query("UPDATE $order SET hidden_from_vendors = ['vendor_a']")
        .bind(("order", market_server::db::repository::OrderRepository::id(&order_id)))
        .await
        .expect("hide order");

    let (status, body) = request(&app, "GET", "/api/orders/available/560001/vendor_a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (status, body) = request(&app, "GET", "/api/orders/available/560001/vendor_b", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn legacy_availability_feed_lists_pending_orders() {
    let state = test_state().await;
    seed_user(&state, "user_1", "560001").await;
    let app = app(&state);
    place_order(&app, "user_1").await;

    let (status, body) = request(&app, "GET", "/api/orders/available/560001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["status"], "pending");
    assert_eq!(body["data"][0]["userName"], "Test User");
}

#[tokio::test]
async fn vendor_feed_carries_user_wallet() {
    let state = test_state().await;
    seed_user(&state, "user_1", "560001").await;
    seed_vendor(&state, "vendor_a", true).await;
    let app = app(&state);
    let order_id = place_order(&app, "user_1").await;
    request(
        &app,
        "PUT",
        &format!("/api/orders/{order_id}/accept"),
        Some(json!({ "vendor_id": "vendor_a" })),
    )
    .await;

    let (status, body) = request(&app, "GET", "/api/orders/vendor/vendor_a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["userName"], "Test User");
    assert_eq!(body["data"][0]["userWalletAddress"], "0xwallet-user_1");
}

#[tokio::test]
async fn user_feed_lists_own_orders_newest_first() {
    let state = test_state().await;
    seed_user(&state, "user_1", "560001").await;
    seed_user(&state, "user_2", "560002").await;
    let app = app(&state);
    place_order(&app, "user_1").await;
    place_order(&app, "user_2").await;
    place_order(&app, "user_1").await;

    let (status, body) = request(&app, "GET", "/api/orders/user/user_1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    for entry in body["data"].as_array().unwrap() {
        assert_eq!(entry["user_id"], "user_1");
    }
}

#[tokio::test]
async fn clerk_signup_is_idempotent_per_role() {
    let state = test_state().await;
    let app = app(&state);

    let payload = json!({
        "clerk_id": "clerk_42",
        "username": "scrappy",
        "email": "scrappy@example.com",
        "role": "user",
    });

    let (status, body) = request(&app, "POST", "/api/users/clerk-signup", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let (status, body) = request(&app, "POST", "/api/users/clerk-signup", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User already exists for this role");

    // Same clerk id may hold a second profile under the vendor role
    let (status, _) = request(
        &app,
        "POST",
        "/api/users/clerk-signup",
        Some(json!({
            "clerk_id": "clerk_42",
            "username": "scrappy",
            "email": "scrappy@example.com",
            "role": "vendor",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = request(&app, "GET", "/api/users?role=vendor", None).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn onboarding_completes_and_checks_profiles() {
    let state = test_state().await;
    let app = app(&state);

    request(
        &app,
        "POST",
        "/api/users/clerk-signup",
        Some(json!({
            "clerk_id": "clerk_v",
            "username": "metals",
            "email": "metals@example.com",
            "role": "vendor",
        })),
    )
    .await;

    // Vendor without a business name is refused
    let (status, _) = request(
        &app,
        "POST",
        "/api/onboarding/complete-profile",
        Some(json!({
            "clerk_id": "clerk_v",
            "role": "vendor",
            "full_address": "8 Industrial Layout",
            "city": "Bengaluru",
            "state": "Karnataka",
            "pincode": "560001",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Malformed pincode is refused
    let (status, _) = request(
        &app,
        "POST",
        "/api/onboarding/complete-profile",
        Some(json!({
            "clerk_id": "clerk_v",
            "role": "vendor",
            "full_address": "8 Industrial Layout",
            "city": "Bengaluru",
            "state": "Karnataka",
            "pincode": "5600",
            "business_name": "Metal Mart",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Valid payload completes the profile; GSTIN is stored uppercased
    let (status, body) = request(
        &app,
        "POST",
        "/api/onboarding/complete-profile",
        Some(json!({
            "clerk_id": "clerk_v",
            "role": "vendor",
            "full_address": "8 Industrial Layout",
            "city": "Bengaluru",
            "state": "Karnataka",
            "pincode": "560001",
            "business_name": "Metal Mart",
            "gstin": "29abcde1234f1z5",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "complete-profile failed: {body}");
    assert_eq!(body["data"]["profile_completed"], true);
    assert_eq!(body["data"]["gstin"], "29ABCDE1234F1Z5");

    let (status, body) = request(
        &app,
        "GET",
        "/api/onboarding/check-profile/clerk_v/vendor",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profileCompleted"], true);

    let (status, _) = request(
        &app,
        "GET",
        "/api/onboarding/check-profile/clerk_missing/user",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn check_profile_downgrades_invalid_vendor() {
    let state = test_state().await;
    // Flagged complete but missing the business name
    seed_vendor(&state, "vendor_bad", false).await;
    let app = app(&state);

    let (status, body) = request(
        &app,
        "GET",
        "/api/onboarding/check-profile/vendor_bad/vendor",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profileCompleted"], false);
}

#[tokio::test]
async fn scrap_catalog_crud_and_filters() {
    let state = test_state().await;
    let app = app(&state);

    let (status, body) = request(
        &app,
        "POST",
        "/api/scrap-items",
        Some(json!({
            "name": "Newspaper",
            "category": "paper",
            "price_per_kg": 12.5,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let paper_id = body["data"]["id"].as_str().unwrap().to_string();

    request(
        &app,
        "POST",
        "/api/scrap-items",
        Some(json!({
            "name": "Copper Wire",
            "category": "metal",
            "price_per_kg": 420.0,
        })),
    )
    .await;

    // Negative prices are rejected
    let (status, _) = request(
        &app,
        "POST",
        "/api/scrap-items",
        Some(json!({
            "name": "Broken Glass",
            "category": "glass",
            "price_per_kg": -1.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = request(&app, "GET", "/api/scrap-items?category=metal", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Copper Wire");

    // Deactivate the paper entry and filter on is_active
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/scrap-items/{paper_id}"),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);

    let (_, body) = request(&app, "GET", "/api/scrap-items?is_active=true", None).await;
    assert_eq!(body["count"], 1);

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/scrap-items/{paper_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = request(&app, "GET", &format!("/api/scrap-items/{paper_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_crud_round_trip() {
    let state = test_state().await;
    let app = app(&state);

    let (status, body) = request(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "clerk_id": "clerk_u",
            "username": "collector",
            "email": "collector@example.com",
            "role": "user",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["profile_completed"], false);

    // Duplicate (clerk_id, role) is refused
    let (status, _) = request(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "clerk_id": "clerk_u",
            "username": "collector",
            "email": "collector@example.com",
            "role": "user",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/users/{user_id}"),
        Some(json!({ "phone_number": "9876543210" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone_number"], "9876543210");
    assert_eq!(body["data"]["username"], "collector");

    let (status, _) = request(&app, "DELETE", &format!("/api/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = request(&app, "GET", &format!("/api/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
