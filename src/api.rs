// Bank Account Manager - REST API
// Axum handlers for the account table, plus the embedded single-page UI

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, warn};
use serde::{Deserialize, Deserializer, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::entities::{Account, NewAccount};
use crate::error::BankError;
use crate::export::{ExportFormat, ExportSummary};
use crate::service::{AccountService, BalanceUpdate, StoreStatus};
use crate::sorting::{SortOutcome, SortRequest};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    service: Arc<Mutex<AccountService>>,
}

impl AppState {
    pub fn new(service: AccountService) -> Self {
        AppState {
            service: Arc::new(Mutex::new(service)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, AccountService>, ApiError> {
        self.service.lock().map_err(|_| {
            error!("Account service lock poisoned");
            ApiError::internal("Account service unavailable")
        })
    }
}

// ============================================================================
// Response envelope
// ============================================================================

/// API Response wrapper: `success` and `message` plus whatever the
/// operation returns
#[derive(Serialize, Default)]
pub struct ApiResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accounts: Option<Vec<Account>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<Account>,
    #[serde(skip_serializing_if = "Option::is_none")]
    update: Option<BalanceUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export: Option<ExportSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<StoreStatus>,
}

impl ApiResponse {
    fn ok(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    fn with_accounts(mut self, accounts: Vec<Account>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    fn with_account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// A failed request: status code plus the envelope with `success: false`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<BankError> for ApiError {
    fn from(err: BankError) -> Self {
        let status = match &err {
            BankError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            BankError::AccountExists(_) => StatusCode::CONFLICT,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", err);
        } else {
            warn!("Request rejected: {}", err);
        }

        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Bad request body: {}", rejection.body_text());
        ApiError::bad_request("Invalid input values")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse {
            success: false,
            message: Some(self.message),
            ..Default::default()
        };
        (self.status, Json(body)).into_response()
    }
}

type ApiResult = Result<ApiResponse, ApiError>;

// ============================================================================
// Request payloads
// ============================================================================

/// HTML number inputs arrive as strings; accept either form
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Lenient::deserialize(deserializer)? {
        Lenient::Int(n) => Ok(n),
        Lenient::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(f as i64),
        Lenient::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Lenient::Float(f) => Err(serde::de::Error::custom(format!("not an integer: {}", f))),
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Lenient::deserialize(deserializer)? {
        Lenient::Int(n) => Ok(n as f64),
        Lenient::Float(f) => Ok(f),
        Lenient::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize)]
struct AddRequest {
    #[serde(deserialize_with = "lenient_i64")]
    account_num: i64,
    last_name: String,
    first_name: String,
    #[serde(deserialize_with = "lenient_f64")]
    balance: f64,
}

impl From<AddRequest> for NewAccount {
    fn from(req: AddRequest) -> Self {
        NewAccount {
            account_num: req.account_num,
            last_name: req.last_name,
            first_name: req.first_name,
            balance: req.balance,
        }
    }
}

#[derive(Deserialize)]
struct UpdateRequest {
    #[serde(deserialize_with = "lenient_i64")]
    account_num: i64,
    #[serde(deserialize_with = "lenient_f64")]
    transaction: f64,
}

#[derive(Deserialize)]
struct DeleteRequest {
    #[serde(deserialize_with = "lenient_i64")]
    account_num: i64,
}

#[derive(Deserialize, Default)]
struct ExportRequest {
    #[serde(default)]
    format: ExportFormat,
}

/// Parse an optional JSON body; an empty body means "use the defaults"
fn optional_body<T: for<'de> Deserialize<'de> + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        warn!("Bad request body: {}", e);
        ApiError::bad_request("Invalid input values")
    })
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Data file status
async fn health_check(State(state): State<AppState>) -> ApiResult {
    let status = state.lock()?.status()?;
    Ok(ApiResponse {
        status: Some(status),
        ..ApiResponse::ok("OK")
    })
}

/// GET /api/accounts - All valid accounts in slot order
async fn list_accounts(State(state): State<AppState>) -> ApiResult {
    let accounts = state.lock()?.list_accounts()?;
    Ok(ApiResponse::ok(format!("{} accounts found", accounts.len())).with_accounts(accounts))
}

/// GET /api/accounts/:num - One account
async fn get_account(State(state): State<AppState>, Path(num): Path<String>) -> ApiResult {
    let num: i64 = num
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid account number"))?;
    let account = state.lock()?.get_account(num)?;
    Ok(ApiResponse::ok(format!("Account #{}", account.acct_num)).with_account(account))
}

/// POST /api/accounts/add - Create an account in an empty slot
async fn add_account(
    State(state): State<AppState>,
    payload: Result<Json<AddRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let account = state.lock()?.add_account(&req.into())?;
    Ok(ApiResponse::ok("Account added successfully!").with_account(account))
}

/// POST /api/accounts/update - Apply a charge or payment
async fn update_account(
    State(state): State<AppState>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let update = state.lock()?.update_account(req.account_num, req.transaction)?;
    Ok(ApiResponse {
        account: Some(update.after.clone()),
        update: Some(update),
        ..ApiResponse::ok("Account updated successfully!")
    })
}

/// POST /api/accounts/delete - Blank an account's slot
async fn delete_account(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let account = state.lock()?.delete_account(req.account_num)?;
    Ok(ApiResponse::ok("Account deleted successfully!").with_account(account))
}

/// POST /api/accounts/export - Write accounts.txt (or accounts.csv)
async fn export_accounts(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let req: ExportRequest = optional_body(&body)?;
    let summary = state.lock()?.export(req.format)?;
    Ok(ApiResponse {
        export: Some(summary),
        ..ApiResponse::ok(format!("Accounts exported to {}", req.format.file_name()))
    })
}

/// POST /api/accounts/sort - Sort by balance or name, or find max/min
async fn sort_accounts(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let req: SortRequest = optional_body(&body)?;
    let outcome = state.lock()?.sort(req)?;

    let response = ApiResponse::ok(req.describe());
    Ok(match outcome {
        SortOutcome::Sorted(accounts) => response.with_accounts(accounts),
        SortOutcome::Extreme(account) => response
            .with_accounts(vec![account.clone()])
            .with_account(account),
    })
}

/// GET / - Serve the single-page UI
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Router
// ============================================================================

/// Build the full application: UI, JSON API and static files
pub fn router(state: AppState, static_dir: impl AsRef<std::path::Path>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/accounts", get(list_accounts))
        .route("/accounts/add", post(add_account))
        .route("/accounts/update", post(update_account))
        .route("/accounts/delete", post(delete_account))
        .route("/accounts/export", post(export_accounts))
        .route("/accounts/sort", post(sort_accounts))
        .route("/accounts/:num", get(get_account))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}
