//! Shared helpers for the integration tests
//!
//! Every test runs against a fresh in-memory SurrealDB through the real
//! router, so the assertions cover routing, handlers, repositories and the
//! response envelope together.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use market_server::core::{Config, ServerState};
use market_server::db;
use market_server::db::models::{UserCreate, UserRole};
use market_server::db::repository::UserRepository;

pub async fn test_state() -> ServerState {
    let database = db::connect_memory().await.expect("in-memory db");
    ServerState::with_db(Config::default(), database)
        .await
        .expect("state")
}

pub fn app(state: &ServerState) -> Router {
    market_server::api::router().with_state(state.clone())
}

/// Send one JSON request and return (status, parsed body)
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            builder.body(Body::from(body.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Seed a user profile with a completed address in `pincode`
pub async fn seed_user(state: &ServerState, clerk_id: &str, pincode: &str) {
    let repo = UserRepository::new(state.db.clone());
    repo.create(
        UserCreate {
            clerk_id: clerk_id.to_string(),
            username: format!("{clerk_id}-name"),
            email: format!("{clerk_id}@example.com"),
            first_name: Some("Test".to_string()),
            last_name: Some("User".to_string()),
            role: UserRole::User,
            phone_number: None,
            wallet_address: Some(format!("0xwallet-{clerk_id}")),
        },
        false,
    )
    .await
    .expect("seed user");
    repo.complete_profile(
        clerk_id,
        UserRole::User,
        json!({
            "address": {
                "full_address": "12 MG Road",
                "city": "Bengaluru",
                "state": "Karnataka",
                "pincode": pincode,
            },
            "profile_completed": true,
        }),
    )
    .await
    .expect("complete user profile");
}

/// Seed a vendor profile; `credentialed` controls business name + GSTIN
pub async fn seed_vendor(state: &ServerState, clerk_id: &str, credentialed: bool) {
    let repo = UserRepository::new(state.db.clone());
    repo.create(
        UserCreate {
            clerk_id: clerk_id.to_string(),
            username: format!("{clerk_id}-name"),
            email: format!("{clerk_id}@example.com"),
            first_name: None,
            last_name: None,
            role: UserRole::Vendor,
            phone_number: None,
            wallet_address: None,
        },
        false,
    )
    .await
    .expect("seed vendor");

    let mut profile = json!({
        "address": {
            "full_address": "8 Industrial Layout",
            "city": "Bengaluru",
            "state": "Karnataka",
            "pincode": "560001",
        },
        "profile_completed": true,
    });
    if credentialed {
        profile["business_name"] = json!("ScrapCo");
        profile["gstin"] = json!("29ABCDE1234F1Z5");
    }
    repo.complete_profile(clerk_id, UserRole::Vendor, profile)
        .await
        .expect("complete vendor profile");
}

/// Place an order via the API and return its id ("order:...")
pub async fn place_order(app: &Router, user_id: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/orders",
        Some(json!({
            "user_id": user_id,
            "items": [
                { "id": 1, "name": "Newspaper", "price": 10.0, "quantity": 2.0 }
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "order creation failed: {body}");
    body["data"]["id"].as_str().expect("order id").to_string()
}
