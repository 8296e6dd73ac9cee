//! Router tests over the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
};
use chrono::Utc;
use http_body_util::BodyExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};
use expensa_core::ledger::InMemoryStore;
use expensa_core::providers::{CountrySource, RateSource, ReceiptScanner, Utf8TextOcr};
use expensa_shared::{JwtConfig, JwtService};

fn app() -> Router {
    let state = AppState::new(
        Arc::new(InMemoryStore::new()),
        JwtService::new(JwtConfig::default()),
        RateSource::offline(),
        CountrySource::offline(),
        ReceiptScanner::new(Arc::new(Utf8TextOcr), Duration::from_secs(1))
            .with_rng(StdRng::seed_from_u64(7)),
    );
    create_router(state)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(format!("/api/v1{uri}"));
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    call(app, request).await
}

/// Signs up a company and returns tokens for admin, employee and manager.
async fn company(app: &Router, name: &str, base: &str) -> (String, String, String) {
    let domain = name.to_lowercase();
    let (status, body) = send(
        app,
        "POST",
        "/signup",
        None,
        Some(json!({
            "company_name": name,
            "base_currency_code": base,
            "admin_name": "Admin User",
            "admin_email": format!("admin@{domain}.example"),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let admin = body["access_token"].as_str().unwrap().to_string();

    let employee = add_member(app, &admin, &domain, "sarah", "employee").await;
    let manager = add_member(app, &admin, &domain, "michael", "manager").await;
    (admin, employee, manager)
}

async fn add_member(app: &Router, admin: &str, domain: &str, person: &str, role: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        Some(admin),
        Some(json!({
            "name": person,
            "email": format!("{person}@{domain}.example"),
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["access_token"].as_str().unwrap().to_string()
}

fn expense_body(amount: &str, currency: &str) -> Value {
    json!({
        "amount": amount,
        "currency_code": currency,
        "category": "Travel & Transportation",
        "description": "Taxi from the airport to the client office",
        "expense_date": Utc::now().date_naive().format("%Y-%m-%d").to_string(),
    })
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_protected_routes_need_token() {
    let app = app();
    let (status, body) = send(&app, "GET", "/expenses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_token");

    let (status, body) = send(&app, "GET", "/expenses", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_signup_session_and_categories() {
    let app = app();
    let (admin, _, _) = company(&app, "Acme", "eur").await;

    let (status, body) = send(&app, "GET", "/me", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["account"]["base_currency_code"], "EUR");

    let (status, body) = send(&app, "GET", "/categories", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 8);
    assert_eq!(categories[0]["over_budget"], false);

    let (_, body) = send(&app, "GET", "/users", Some(&admin), None).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_signup_validation() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({
            "company_name": " ",
            "base_currency_code": "dollars",
            "admin_name": "Admin",
            "admin_email": "nobody",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["violations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_only_admin_adds_users() {
    let app = app();
    let (_, employee, _) = company(&app, "Acme", "USD").await;
    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(&employee),
        Some(json!({ "name": "Eve", "email": "eve@acme.example", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_submit_and_approve_flow() {
    let app = app();
    let (_, employee, manager) = company(&app, "Acme", "USD").await;

    let (status, created) = send(
        &app,
        "POST",
        "/expenses",
        Some(&employee),
        Some(expense_body("1500", "EUR")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // 1500 / 0.92 = 1630.434...
    assert_eq!(created["base_currency_amount"], "1630.43");
    assert_eq!(created["approval_chain"], json!(["manager", "finance"]));
    assert_eq!(created["status"], "pending_approval");
    assert_eq!(created["can_act"], false);
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/expenses/{id}/approve"),
        Some(&employee),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "NOT_AUTHORIZED_TO_APPROVE");

    let (_, listed) = send(&app, "GET", "/expenses", Some(&manager), None).await;
    assert_eq!(listed["expenses"][0]["can_act"], true);

    let (status, approved) = send(
        &app,
        "POST",
        &format!("/expenses/{id}/approve"),
        Some(&manager),
        Some(json!({ "comments": "Approved for Q4" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approval_comments"], "Approved for Q4");
    assert_eq!(approved["can_act"], false);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/expenses/{id}/reject"),
        Some(&manager),
        Some(json!({ "reason": "Changed my mind" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "INVALID_TRANSITION");

    let (_, filtered) = send(
        &app,
        "GET",
        "/expenses?status=pending_approval",
        Some(&manager),
        None,
    )
    .await;
    assert!(filtered["expenses"].as_array().unwrap().is_empty());

    let (_, summary) = send(&app, "GET", "/expenses/summary", Some(&manager), None).await;
    assert_eq!(summary["count"], 1);
    assert_eq!(summary["total"], "1630.43");
}

#[tokio::test]
async fn test_reject_requires_reason() {
    let app = app();
    let (_, employee, manager) = company(&app, "Acme", "USD").await;
    let (_, created) = send(
        &app,
        "POST",
        "/expenses",
        Some(&employee),
        Some(expense_body("45.00", "USD")),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/expenses/{id}/reject"),
        Some(&manager),
        Some(json!({ "reason": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "REJECTION_REASON_REQUIRED");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/expenses/{id}/reject"),
        Some(&manager),
        Some(json!({ "reason": "Personal trip" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rejection_reason"], "Personal trip");
}

#[tokio::test]
async fn test_invalid_submission_lists_violations() {
    let app = app();
    let (_, employee, _) = company(&app, "Acme", "USD").await;
    let (status, body) = send(
        &app,
        "POST",
        "/expenses",
        Some(&employee),
        Some(json!({
            "amount": "-5",
            "currency_code": "USD",
            "category": "Yachts",
            "description": "short",
            "expense_date": "2999-01-01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<_> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields.len(), 4);
    assert!(fields.contains(&"category".to_string()));
}

#[tokio::test]
async fn test_numeric_amount_is_accepted() {
    let app = app();
    let (_, employee, _) = company(&app, "Acme", "USD").await;
    let mut body = expense_body("0", "USD");
    body["amount"] = json!(125.50);
    let (status, created) = send(&app, "POST", "/expenses", Some(&employee), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["original_amount"], "125.5");
}

#[tokio::test]
async fn test_sparse_submission_lists_every_violation() {
    let app = app();
    let (_, employee, _) = company(&app, "Acme", "USD").await;
    let (status, body) = send(
        &app,
        "POST",
        "/expenses",
        Some(&employee),
        Some(json!({ "amount": "-5", "description": "short", "ocr_confidence": 150 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    let mut fields: Vec<_> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap().to_string())
        .collect();
    fields.sort();
    assert_eq!(
        fields,
        [
            "amount",
            "category",
            "currency_code",
            "description",
            "expense_date",
            "ocr_confidence"
        ]
    );
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let app = app();
    let (_, employee, _) = company(&app, "Acme", "USD").await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/expenses")
        .header(AUTHORIZATION, format!("Bearer {employee}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"amount\": "))
        .unwrap();
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_BODY");
    assert!(body["message"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/expenses",
        Some(&employee),
        Some(json!({ "amount": [1, 2] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "INVALID_BODY");
}

#[tokio::test]
async fn test_accounts_do_not_see_each_other() {
    let app = app();
    let (_, employee, _) = company(&app, "Acme", "USD").await;
    let (globex, _, _) = company(&app, "Globex", "USD").await;

    let (_, created) = send(
        &app,
        "POST",
        "/expenses",
        Some(&employee),
        Some(expense_body("99.00", "USD")),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, "GET", &format!("/expenses/{id}"), Some(&globex), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "EXPENSE_NOT_FOUND");
}

#[tokio::test]
async fn test_scan_text_receipt() {
    let app = app();
    let (_, employee, _) = company(&app, "Acme", "USD").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/receipts/scan?currency=gbp")
        .header(AUTHORIZATION, format!("Bearer {employee}"))
        .body(Body::from("Uber Technologies Inc\nTrip fare\nTotal: £23.10"))
        .unwrap();
    let (status, body) = call(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["receipt"]["simulated"], false);
    assert_eq!(body["receipt"]["category"], "Travel & Transportation");
    assert_eq!(body["draft"]["amount"], "23.10");
    assert_eq!(body["draft"]["currency_code"], "GBP");
    assert_eq!(body["draft"]["description"], "Receipt from Uber Technologies Inc");
}

#[tokio::test]
async fn test_rates_and_currencies_are_public() {
    let app = app();

    let (status, body) = send(&app, "GET", "/exchange-rates?from=eur&to=gbp", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pivot"], "USD");
    assert_eq!(body["rates"].as_object().unwrap().len(), 12);
    // 0.79 / 0.92 = 0.85869...
    assert_eq!(body["pair"]["rate"], "0.8587");

    let (status, body) = send(&app, "GET", "/currencies", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["countries"].as_array().unwrap().len() >= 8);
    assert!(
        body["currencies"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["code"] == "USD")
    );
}
