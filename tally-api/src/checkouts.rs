use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tally_core::{CheckoutSession, RulesProvider, SessionHandle, SessionRepository};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    #[serde(rename = "checkoutId")]
    pub checkout_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub sku: String,
}

#[derive(Debug, Serialize)]
pub struct TotalPriceResponse {
    #[serde(rename = "checkoutId")]
    pub checkout_id: Uuid,
    #[serde(rename = "totalPrice")]
    pub total_price: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/checkouts", post(create_checkout))
        .route("/checkouts/{checkout_id}", get(get_total_price))
        .route("/checkouts/{checkout_id}/scan", post(scan_item))
}

async fn create_checkout(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateCheckoutResponse>), AppError> {
    let session = CheckoutSession::new();
    let checkout_id = session.id();

    let handle: SessionHandle = Arc::new(RwLock::new(session));
    state.store.save(handle).await?;

    tracing::info!(checkout_id = %checkout_id, "created checkout");
    Ok((
        StatusCode::CREATED,
        Json(CreateCheckoutResponse { checkout_id }),
    ))
}

async fn scan_item(
    State(state): State<AppState>,
    Path(checkout_id): Path<String>,
    body: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let checkout_id = parse_checkout_id(&checkout_id)?;
    let session = state.store.get(checkout_id).await.inspect_err(|_| {
        tracing::info!(checkout_id = %checkout_id, "scan against unknown session");
    })?;

    let Json(request) = body.map_err(|err| {
        tracing::warn!(checkout_id = %checkout_id, error = %err, "malformed scan body");
        AppError::BadRequest("invalid request body".to_string())
    })?;

    let rules = state.rules.rules();
    session
        .write()
        .await
        .scan(&request.sku, &rules)
        .inspect_err(|err| {
            tracing::warn!(checkout_id = %checkout_id, error = %err, "rejected scan");
        })?;
    state.store.save(session).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn get_total_price(
    State(state): State<AppState>,
    Path(checkout_id): Path<String>,
) -> Result<Json<TotalPriceResponse>, AppError> {
    let checkout_id = parse_checkout_id(&checkout_id)?;
    let session = state.store.get(checkout_id).await.inspect_err(|_| {
        tracing::info!(checkout_id = %checkout_id, "total for unknown session");
    })?;

    let total_price = session.read().await.total_price();
    Ok(Json(TotalPriceResponse {
        checkout_id,
        total_price,
    }))
}

// Identifiers are opaque to clients; a malformed one simply names no session.
fn parse_checkout_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("session not found".to_string()))
}
