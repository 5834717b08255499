//! HTTP integration tests
//!
//! Each test builds the full router over a fresh data file in a temp
//! directory and drives it with `tower::ServiceExt::oneshot`.

#![cfg(feature = "server")]

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use bank_manager::api::{router, AppState};
use bank_manager::{AccountService, CreditFile};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn setup() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let store = CreditFile::create(dir.path().join("credit.dat")).unwrap();
    let service = AccountService::new(store, dir.path());
    let app = router(AppState::new(service), dir.path());
    (dir, app)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn add(app: &Router, num: u32, last: &str, first: &str, balance: f64) {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/accounts/add",
        Some(json!({
            "account_num": num,
            "last_name": last,
            "first_name": first,
            "balance": balance,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
}

#[tokio::test]
async fn test_index_page_served() {
    let (_dir, app) = setup();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Bank Account Manager"));
}

#[tokio::test]
async fn test_health_reports_data_file() {
    let (_dir, app) = setup();
    let (status, body) = call(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"]["slot_capacity"], 100);
    assert_eq!(body["status"]["active_accounts"], 0);
    assert_eq!(body["status"]["exists"], true);
}

#[tokio::test]
async fn test_list_starts_empty() {
    let (_dir, app) = setup();
    let (status, body) = call(&app, Method::GET, "/api/accounts", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["accounts"], json!([]));
}

#[tokio::test]
async fn test_add_then_list_and_get() {
    let (_dir, app) = setup();
    add(&app, 29, "Brown", "Nancy", -24.54).await;

    let (_, body) = call(&app, Method::GET, "/api/accounts", None).await;
    assert_eq!(
        body["accounts"],
        json!([{ "acct_num": 29, "last_name": "Brown", "first_name": "Nancy", "balance": -24.54 }])
    );

    let (status, body) = call(&app, Method::GET, "/api/accounts/29", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["last_name"], "Brown");

    let (status, body) = call(&app, Method::GET, "/api/accounts/30", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Account #30 does not exist");
}

#[tokio::test]
async fn test_get_non_numeric_account_is_bad_request() {
    let (_dir, app) = setup();
    let (status, body) = call(&app, Method::GET, "/api/accounts/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": "Invalid account number" }));
}

#[tokio::test]
async fn test_add_accepts_string_fields_from_html_inputs() {
    let (_dir, app) = setup();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/accounts/add",
        Some(json!({
            "account_num": "7",
            "last_name": " Ng ",
            "first_name": "Kim",
            "balance": "12.50",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account added successfully!");
    assert_eq!(body["account"]["last_name"], "Ng");
    assert_eq!(body["account"]["balance"], 12.5);
}

#[tokio::test]
async fn test_add_duplicate_conflicts() {
    let (_dir, app) = setup();
    add(&app, 5, "Lopez", "Ana", 10.0).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/accounts/add",
        Some(json!({ "account_num": 5, "last_name": "X", "first_name": "Y", "balance": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Account #5 already exists");
}

#[tokio::test]
async fn test_add_validation_errors() {
    let (_dir, app) = setup();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/accounts/add",
        Some(json!({ "account_num": 101, "last_name": "X", "first_name": "Y", "balance": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Account number must be between 1 and 100");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/accounts/add",
        Some(json!({ "account_num": 1, "last_name": "  ", "first_name": "Y", "balance": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "First and last name are required");
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let (_dir, app) = setup();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/accounts/delete")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "success": false, "message": "Invalid input values" }));
}

#[tokio::test]
async fn test_update_applies_transaction() {
    let (_dir, app) = setup();
    add(&app, 12, "Jones", "Mary", 100.0).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/accounts/update",
        Some(json!({ "account_num": "12", "transaction": "-40.25" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account updated successfully!");
    assert_eq!(body["update"]["before"]["balance"], 100.0);
    assert_eq!(body["update"]["after"]["balance"], 59.75);
    assert_eq!(body["account"]["balance"], 59.75);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/accounts/update",
        Some(json!({ "account_num": 13, "transaction": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Account #13 does not exist");
}

#[tokio::test]
async fn test_delete_account() {
    let (_dir, app) = setup();
    add(&app, 3, "White", "Sam", 0.0).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/accounts/delete",
        Some(json!({ "account_num": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account deleted successfully!");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/accounts/delete",
        Some(json!({ "account_num": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_text_and_csv() {
    let (dir, app) = setup();
    add(&app, 29, "Brown", "Nancy", -24.54).await;

    let (status, body) = call(&app, Method::POST, "/api/accounts/export", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Accounts exported to accounts.txt");
    assert_eq!(body["export"]["count"], 1);

    let text = std::fs::read_to_string(dir.path().join("accounts.txt")).unwrap();
    assert_eq!(
        text,
        "Acct  Last Name       First Name    Balance\n29    Brown           Nancy          -24.54\n"
    );

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/accounts/export",
        Some(json!({ "format": "csv" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["export"]["format"], "csv");
    assert!(dir.path().join("accounts.csv").exists());
}

#[tokio::test]
async fn test_sort_variants() {
    let (_dir, app) = setup();
    add(&app, 29, "Brown", "Nancy", -24.54).await;
    add(&app, 33, "Dunn", "Stacey", 314.33).await;
    add(&app, 37, "Barker", "Doug", 0.0).await;

    // No body: balance, highest first
    let (status, body) = call(&app, Method::POST, "/api/accounts/sort", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Sorted by Balance (Desc)");
    let order: Vec<i64> = body["accounts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["acct_num"].as_i64().unwrap())
        .collect();
    assert_eq!(order, vec![33, 37, 29]);

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/accounts/sort",
        Some(json!({ "criterion": 2, "order": 1 })),
    )
    .await;
    assert_eq!(body["message"], "Sorted by Name (Asc)");
    assert_eq!(body["accounts"][0]["last_name"], "Barker");

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/accounts/sort",
        Some(json!({ "criterion": 4, "order": 1 })),
    )
    .await;
    assert_eq!(body["message"], "Minimum balance account found");
    assert_eq!(body["account"]["acct_num"], 29);
    assert_eq!(body["accounts"].as_array().unwrap().len(), 1);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/accounts/sort",
        Some(json!({ "criterion": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sort_empty_table() {
    let (_dir, app) = setup();
    let (status, body) = call(&app, Method::POST, "/api/accounts/sort", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No accounts found");
}
