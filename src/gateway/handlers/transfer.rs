//! Transfer handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, ApiResult, ok};
use crate::transfer::{PositiveAmount, Transfer, TransferRequest, TransferView};

pub const TRANSFER_OK_MESSAGE: &str = "Transferencia realizada con éxito";

/// Move money between two users
///
/// POST /transferencia
#[utoipa::path(
    post,
    path = "/transferencia",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer committed", body = Transfer, content_type = "application/json"),
        (status = 400, description = "Malformed body, insufficient funds, invalid amount, or sender equals receiver"),
        (status = 404, description = "Sender or receiver does not exist"),
        (status = 500, description = "Internal error, nothing was applied")
    ),
    tag = "Transfer"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult<Transfer> {
    let Json(req) = payload?;
    let amount = PositiveAmount::try_from(req.amount).map_err(ApiError::from)?;

    let transfer = state
        .transfers
        .execute(req.sender, req.receiver, amount)
        .await?;

    Ok(Json(ApiResponse::success_with_msg(
        transfer,
        TRANSFER_OK_MESSAGE,
    )))
}

/// Ledger with sender and receiver names
///
/// GET /transferencias
#[utoipa::path(
    get,
    path = "/transferencias",
    responses(
        (status = 200, description = "Transfers, oldest first", body = Vec<TransferView>, content_type = "application/json"),
        (status = 500, description = "Internal error")
    ),
    tag = "Transfer"
)]
pub async fn list_transfers(State(state): State<Arc<AppState>>) -> ApiResult<Vec<TransferView>> {
    let rows = state.transfers.list().await?;
    ok(rows)
}
