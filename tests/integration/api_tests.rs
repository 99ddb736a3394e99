//! API integration tests, driven in-process through the router

use std::sync::Arc;

use agrirent_server::{api, store::MemoryStore, AppConfig, AppState};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    api::router(AppState::new(AppConfig::default(), Arc::new(MemoryStore::new())))
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn sign_in(app: &Router, id: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/session",
        None,
        Some(json!({ "id": id, "name": format!("User {}", id) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["token_type"], "Bearer");
    body["token"].as_str().unwrap().to_string()
}

async fn create_listing(app: &Router, token: &str, name: &str, rate: f64, insurance: bool) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/listings",
        Some(token),
        Some(json!({
            "name": name,
            "description": format!("{} in good condition", name),
            "dailyRate": rate,
            "deposit": 250,
            "insuranceRequired": insurance,
            "availableFrom": "2024-01-01",
            "availableTo": "2024-12-31"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    // Identifiers are millisecond timestamps
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_session_roundtrip() {
    let app = app();
    let token = sign_in(&app, "farmer-1").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "farmer-1");

    let (status, _) = send(&app, Method::GET, "/api/v1/session", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_listing_requires_sign_in() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/listings",
        None,
        Some(json!({ "name": "Plow", "description": "Three furrow", "dailyRate": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Please sign in to list equipment");
}

#[tokio::test]
async fn test_listing_missing_fields() {
    let app = app();
    let token = sign_in(&app, "owner").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/listings",
        Some(&token),
        Some(json!({ "name": "Plow", "description": "", "dailyRate": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please fill in all required fields");
}

#[tokio::test]
async fn test_catalog_filters() {
    let app = app();
    let token = sign_in(&app, "owner").await;
    create_listing(&app, &token, "Tractor", 450.0, true).await;
    create_listing(&app, &token, "Hay Rake", 60.0, false).await;
    create_listing(&app, &token, "Combine", 1500.0, true).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/listings", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|l| l["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Tractor", "Hay Rake", "Combine"]);

    let (_, body) = send(&app, Method::GET, "/api/v1/listings?price=high", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Combine");

    let (_, body) = send(&app, Method::GET, "/api/v1/listings?search=RAKE&price=low", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["dailyRate"], json!(60.0));

    let (_, body) = send(&app, Method::GET, "/api/v1/listings?search=condition&price=medium", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Tractor");
}

#[tokio::test]
async fn test_rental_flow() {
    let app = app();
    let owner = sign_in(&app, "owner").await;
    let renter = sign_in(&app, "renter").await;
    let id = create_listing(&app, &owner, "Tractor", 100.0, true).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/listings/{}/quote", id),
        None,
        Some(json!({ "startDate": "2024-01-01", "endDate": "2024-01-03" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalDays"], 2);
    assert_eq!(body["totalCost"], json!(200.0));

    // Insurance not accepted
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/listings/{}/rentals", id),
        Some(&renter),
        Some(json!({ "startDate": "2024-01-01", "endDate": "2024-01-03" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Insurance is required for this equipment");

    // Reversed dates
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/listings/{}/rentals", id),
        Some(&renter),
        Some(json!({ "startDate": "2024-01-05", "endDate": "2024-01-03", "acceptInsurance": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "End date must be after start date");

    let (_, body) = send(&app, Method::GET, "/api/v1/rentals", Some(&renter), None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/listings/{}/rentals", id),
        Some(&renter),
        Some(json!({ "startDate": "2024-01-01", "endDate": "2024-01-03", "acceptInsurance": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["details"]["totalCost"], json!(200.0));
    assert_eq!(body["details"]["insuranceRequired"], true);
    assert_eq!(body["rental"]["status"], "pending");
    assert_eq!(body["rental"]["renterId"], "renter");

    let (_, body) = send(&app, Method::GET, "/api/v1/rentals", Some(&renter), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (_, body) = send(&app, Method::GET, "/api/v1/rentals", Some(&owner), None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_delete_is_owner_gated() {
    let app = app();
    let owner = sign_in(&app, "owner").await;
    let intruder = sign_in(&app, "intruder").await;
    let id = create_listing(&app, &owner, "Tractor", 100.0, false).await;
    let uri = format!("/api/v1/listings/{}?confirm=true", id);

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You can only delete your own listings");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/listings/{}", id), Some(&owner), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, &format!("/api/v1/listings/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/api/v1/listings/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_snapshot_import_export() {
    let app = app();
    let token = sign_in(&app, "u1").await;

    let listings = json!([{
        "id": 1718000000000i64, "name": "Tractor", "description": "120hp", "dailyRate": 350,
        "deposit": 1000, "images": [], "insuranceRequired": true, "condition": "", "specifications": "",
        "availableFrom": "2024-06-01", "availableTo": "2024-09-30", "ownerId": "u1",
        "createdAt": "2024-06-10T06:13:20.000Z", "status": "available"
    }]);
    let dump = json!({
        "equipmentListings": listings.to_string(),
        "equipment": json!([{ "id": 5, "name": "Baler", "price": 80, "location": "Ames", "imageUrl": "" }]).to_string(),
        "rentals": "[]"
    });

    let (status, body) = send(&app, Method::POST, "/api/v1/storage/snapshot", Some(&token), Some(dump)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["listings"], 1);
    assert_eq!(body["legacy_listings"], 1);

    let (_, body) = send(&app, Method::GET, "/api/v1/listings?price=low", None, None).await;
    assert_eq!(body[0]["name"], "Baler");
    assert_eq!(body[0]["schema"], "priced");

    let (status, body) = send(&app, Method::GET, "/api/v1/storage/snapshot", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let exported: Value = serde_json::from_str(body["equipmentListings"].as_str().unwrap()).unwrap();
    assert_eq!(exported[0]["id"], 1718000000000i64);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/storage/snapshot",
        Some(&token),
        Some(json!({ "rentals": "not json" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_snapshot_import_is_owner_scoped() {
    let app = app();
    let owner = sign_in(&app, "owner").await;
    let other = sign_in(&app, "other").await;
    create_listing(&app, &owner, "Tractor", 100.0, false).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/storage/snapshot",
        Some(&other),
        Some(json!({ "equipment": "[]", "equipmentListings": "[]" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (_, body) = send(&app, Method::GET, "/api/v1/listings", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["ownerId"], "owner");

    let foreign = json!([{ "id": 9, "name": "Baler", "price": 80, "ownerId": "owner" }]);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/storage/snapshot",
        Some(&other),
        Some(json!({ "equipment": foreign.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_huge_daily_rate_rejected() {
    let app = app();
    let token = sign_in(&app, "owner").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/listings",
        Some(&token),
        Some(json!({ "name": "Gold Plow", "description": "Very dear", "dailyRate": 1e28 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Daily rate is too large");
}
