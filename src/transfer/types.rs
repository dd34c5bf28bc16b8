//! Transfer types: ledger rows, read model, and the validated amount.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::error::TransferError;
use crate::account::UserId;
use crate::money;

/// Ledger row, written once at the end of a successful transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transfer {
    pub id: i32,
    #[serde(rename = "emisor")]
    #[sqlx(rename = "emisor")]
    #[schema(value_type = i32)]
    pub sender: UserId,
    #[serde(rename = "receptor")]
    #[sqlx(rename = "receptor")]
    #[schema(value_type = i32)]
    pub receiver: UserId,
    #[serde(rename = "monto")]
    #[sqlx(rename = "monto")]
    #[schema(value_type = String, example = "40.00")]
    pub amount: Decimal,
    #[serde(rename = "fecha")]
    #[sqlx(rename = "fecha")]
    pub timestamp: DateTime<Utc>,
}

/// Ledger row with participant names resolved at read time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TransferView {
    pub id: i32,
    #[serde(rename = "emisor")]
    #[sqlx(rename = "emisor")]
    #[schema(example = "Ana")]
    pub sender_name: String,
    #[serde(rename = "receptor")]
    #[sqlx(rename = "receptor")]
    #[schema(example = "Beto")]
    pub receiver_name: String,
    #[serde(rename = "monto")]
    #[sqlx(rename = "monto")]
    #[schema(value_type = String, example = "40.00")]
    pub amount: Decimal,
    #[serde(rename = "fecha")]
    #[sqlx(rename = "fecha")]
    pub timestamp: DateTime<Utc>,
}

/// POST /transferencia body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransferRequest {
    #[serde(rename = "emisor")]
    #[schema(value_type = i32, example = 1)]
    pub sender: UserId,
    #[serde(rename = "receptor")]
    #[schema(value_type = i32, example = 2)]
    pub receiver: UserId,
    #[serde(rename = "monto")]
    #[schema(value_type = String, example = "40.00")]
    pub amount: Decimal,
}

/// Strictly positive transfer amount with at most two fractional digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PositiveAmount(Decimal);

impl PositiveAmount {
    #[inline]
    pub fn get(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for PositiveAmount {
    type Error = TransferError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value <= Decimal::ZERO {
            return Err(TransferError::InvalidAmount);
        }
        money::check_money(value)
            .map(Self)
            .map_err(|_| TransferError::InvalidAmount)
    }
}

impl std::fmt::Display for PositiveAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
