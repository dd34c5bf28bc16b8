//! Transfer Error Types

use thiserror::Error;

use crate::account::UserId;
use crate::store::StoreError;

/// Message returned for every failure that is not the caller's fault
pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor.";

/// Transfer error types
///
/// Every variant is reported only after the unit of work has been discarded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("La cuenta del emisor no tiene saldo suficiente")]
    InsufficientFunds,

    #[error("Usuario no encontrado: {0}")]
    InvalidReference(UserId),

    #[error("El monto debe ser mayor que cero y tener como máximo dos decimales")]
    InvalidAmount,

    #[error("El emisor y el receptor deben ser distintos")]
    SameParticipant,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            TransferError::InvalidReference(_) => "INVALID_REFERENCE",
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::SameParticipant => "SAME_PARTICIPANT",
            TransferError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::InsufficientFunds
            | TransferError::InvalidAmount
            | TransferError::SameParticipant => 400,
            TransferError::InvalidReference(_) => 404,
            TransferError::Internal(_) => 500,
        }
    }

    /// Message safe to show the caller. Internal detail is never included.
    pub fn client_message(&self) -> String {
        match self {
            TransferError::InvalidReference(_) => "Usuario no encontrado".to_string(),
            TransferError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }
}

impl From<StoreError> for TransferError {
    fn from(err: StoreError) -> Self {
        TransferError::Internal(err.to_string())
    }
}
