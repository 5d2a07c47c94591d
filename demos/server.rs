//! REST API server for the wallet engine.
//!
//! Run with: `cargo run --example server` (listens on `$PORT`, default 3000)
//!
//! ## Endpoints
//!
//! - `GET  /api/health` - Liveness check
//! - `GET  /api/wallets` - List all accounts
//! - `GET  /api/wallet/{account}` - Balances (creates the account on first use)
//! - `GET  /api/wallet/{account}/ledger` - Ledger entries, newest first
//! - `POST /api/wallet/{account}/award` - `{"currency": "POINTS", "amount": "150", "reason": "bonus"}`
//! - `POST /api/wallet/{account}/redeem` - `{"points": "100", "reason": "shop"}`
//! - `POST /api/wallet/{account}/withdraw` - `{"amount": "20", "reason": "cashout"}`
//! - `POST /api/wallet/{account}/convert` - `{"direction": "POINTS_TO_MONEY", "amount": "3"}`
//!
//! ## Example Usage
//!
//! ```bash
//! curl -X POST http://localhost:3000/api/wallet/alice/award \
//!   -H "Content-Type: application/json" \
//!   -d '{"currency": "POINTS", "amount": "150", "reason": "bonus"}'
//!
//! curl http://localhost:3000/api/wallet/alice/ledger
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use points_wallet::{
    AccountId, AccountSnapshot, Currency, Direction, Engine, LedgerEntry, LedgerError, Receipt,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

// === Request/Response DTOs ===

#[derive(Debug, Deserialize)]
pub struct AwardRequest {
    pub currency: String,
    pub amount: Decimal,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub points: Decimal,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub reason: String,
}

/// Direction stays a string so unknown values surface as `INVALID_DIRECTION`
/// rather than a body parse failure.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub direction: String,
    pub amount: Decimal,
}

/// Response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// === Application State ===

/// Shared application state containing the wallet engine.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

// === Error Handling ===

/// Wrapper for converting `LedgerError` into HTTP responses.
pub struct AppError(LedgerError);

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LedgerError::InvalidInput(_) | LedgerError::InvalidDirection => {
                StatusCode::BAD_REQUEST
            }
            LedgerError::InsufficientPoints | LedgerError::InsufficientFunds => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: self.0.code().to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/wallets
async fn list_wallets(State(state): State<AppState>) -> Json<Vec<AccountSnapshot>> {
    Json(state.engine.accounts())
}

/// GET /api/wallet/{account}
async fn get_balance(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Json<AccountSnapshot> {
    Json(state.engine.balance(&AccountId::from(account)))
}

/// GET /api/wallet/{account}/ledger
async fn get_ledger(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Json<Vec<LedgerEntry>> {
    Json(state.engine.ledger(&AccountId::from(account)))
}

/// POST /api/wallet/{account}/award
async fn award(
    State(state): State<AppState>,
    Path(account): Path<String>,
    Json(request): Json<AwardRequest>,
) -> Result<Json<Receipt>, AppError> {
    let currency = request.currency.parse::<Currency>()?;
    let receipt = state.engine.award(
        &AccountId::from(account),
        currency,
        request.amount,
        &request.reason,
    )?;
    Ok(Json(receipt))
}

/// POST /api/wallet/{account}/redeem
async fn redeem(
    State(state): State<AppState>,
    Path(account): Path<String>,
    Json(request): Json<RedeemRequest>,
) -> Result<Json<Receipt>, AppError> {
    let receipt =
        state
            .engine
            .redeem(&AccountId::from(account), request.points, &request.reason)?;
    Ok(Json(receipt))
}

/// POST /api/wallet/{account}/withdraw
async fn withdraw(
    State(state): State<AppState>,
    Path(account): Path<String>,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<Receipt>, AppError> {
    let receipt =
        state
            .engine
            .withdraw(&AccountId::from(account), request.amount, &request.reason)?;
    Ok(Json(receipt))
}

/// POST /api/wallet/{account}/convert
async fn convert(
    State(state): State<AppState>,
    Path(account): Path<String>,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<Receipt>, AppError> {
    let direction = request.direction.parse::<Direction>()?;
    let receipt = state
        .engine
        .convert(&AccountId::from(account), direction, request.amount)?;
    Ok(Json(receipt))
}

// === Router ===

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/wallets", get(list_wallets))
        .route("/api/wallet/{account}", get(get_balance))
        .route("/api/wallet/{account}/ledger", get(get_ledger))
        .route("/api/wallet/{account}/award", post(award))
        .route("/api/wallet/{account}/redeem", post(redeem))
        .route("/api/wallet/{account}/withdraw", post(withdraw))
        .route("/api/wallet/{account}/convert", post(convert))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let port: u16 = match std::env::var("PORT") {
        Ok(port) => port.parse()?,
        Err(_) => 3000,
    };

    let state = AppState {
        engine: Arc::new(Engine::new()),
    };
    let app = create_router(state);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "wallet API server running");

    axum::serve(listener, app).await?;
    Ok(())
}
