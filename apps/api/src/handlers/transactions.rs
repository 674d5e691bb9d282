//! Ledger handlers: checkout, reads, void.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use warung_core::sequence::day_key_from_date_str;
use warung_core::types::{CartEntry, Principal, Transaction};
use warung_core::CoreError;

use crate::error::ApiError;
use crate::handlers::ReceiptInfo;
use crate::services::ledger::{CheckoutRequest, VoidConfirmation};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub items: Vec<CartEntry>,
    pub payment_method: String,
    pub payment_amount: i64,
    pub payment_reference: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub receipt: ReceiptInfo,
}

#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// `YYYY-MM-DD`; filters on the embedded business-day key.
    pub date: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct VoidRequest {
    pub reason: String,
}

/// `POST /api/v1/transactions`
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let transaction = state
        .ledger()
        .checkout(
            &principal,
            CheckoutRequest {
                cart: payload.items,
                payment_method: payload.payment_method,
                payment_amount: payload.payment_amount,
                payment_reference: payload.payment_reference,
            },
        )
        .await?;

    let tenant = state.db.tenants().get(&principal.tenant_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            transaction,
            receipt: ReceiptInfo::from_tenant(tenant),
        }),
    ))
}

/// `GET /api/v1/transactions`
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let day_key = match &query.date {
        Some(date) => Some(day_key_from_date_str(date).map_err(CoreError::from)?),
        None => None,
    };

    let (transactions, total) = state
        .ledger()
        .list(
            &principal,
            day_key.as_deref(),
            query.limit.unwrap_or(50),
            query.offset.unwrap_or(0),
        )
        .await?;

    Ok(Json(TransactionListResponse {
        transactions,
        total,
    }))
}

/// `GET /api/v1/transactions/{id}`
pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction = state.ledger().get(&principal, &transaction_id).await?;
    let tenant = state.db.tenants().get(&principal.tenant_id).await?;

    Ok(Json(TransactionResponse {
        transaction,
        receipt: ReceiptInfo::from_tenant(tenant),
    }))
}

/// `POST /api/v1/transactions/{id}/void`
pub async fn void(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(transaction_id): Path<String>,
    Json(payload): Json<VoidRequest>,
) -> Result<Json<VoidConfirmation>, ApiError> {
    let confirmation = state
        .ledger()
        .void(&principal, &transaction_id, &payload.reason)
        .await?;

    Ok(Json(confirmation))
}
