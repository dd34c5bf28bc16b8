//! API response envelope, error type and error codes

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::account::AccountError;
use crate::transfer::TransferError;
use crate::transfer::error::INTERNAL_ERROR_MESSAGE;

/// Returned for any body or query string that does not parse; serde detail is only logged
pub const MALFORMED_REQUEST_MESSAGE: &str = "Solicitud inválida.";

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = 0)]
    pub code: i32,
    #[schema(example = "ok")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_msg(data, "ok")
    }

    pub fn success_with_msg(data: T, msg: impl Into<String>) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: msg.into(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

// ============================================================================
// Errors
// ============================================================================

/// Error response: HTTP status plus the envelope body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::USER_NOT_FOUND, msg)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            INTERNAL_ERROR_MESSAGE,
        )
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            msg,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.code, self.msg))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(
            status = %rejection.status(),
            error = %rejection.body_text(),
            "Rejected request body"
        );
        Self::bad_request(MALFORMED_REQUEST_MESSAGE)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!(
            status = %rejection.status(),
            error = %rejection.body_text(),
            "Rejected query string"
        );
        Self::bad_request(MALFORMED_REQUEST_MESSAGE)
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = match err {
            TransferError::InsufficientFunds => error_codes::INSUFFICIENT_BALANCE,
            TransferError::InvalidAmount | TransferError::SameParticipant => {
                error_codes::INVALID_PARAMETER
            }
            TransferError::InvalidReference(_) => error_codes::USER_NOT_FOUND,
            TransferError::Internal(_) => error_codes::INTERNAL_ERROR,
        };
        Self::new(status, code, err.client_message())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(_) => Self::not_found(err.to_string()),
            AccountError::InvalidName
            | AccountError::NegativeBalance
            | AccountError::InvalidBalance => {
                Self::bad_request(err.to_string())
            }
            AccountError::InUse(_) => {
                Self::new(StatusCode::CONFLICT, error_codes::USER_IN_USE, err.to_string())
            }
            AccountError::Internal(_) => Self::internal(),
        }
    }
}

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;

    // Resource errors (4xxx)
    pub const USER_NOT_FOUND: i32 = 4001;
    pub const ROUTE_NOT_FOUND: i32 = 4004;
    pub const USER_IN_USE: i32 = 4009;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["msg"], "ok");
        assert_eq!(json["data"], 5);
    }

    #[test]
    fn test_error_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::error(1001, "bad")).unwrap();
        assert_eq!(json["code"], 1001);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_transfer_error_mapping() {
        let err = ApiError::from(TransferError::InsufficientFunds);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, error_codes::INSUFFICIENT_BALANCE);
        assert_eq!(err.msg, "La cuenta del emisor no tiene saldo suficiente");

        let err = ApiError::from(TransferError::Internal("socket closed".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.msg, INTERNAL_ERROR_MESSAGE);

        let err = ApiError::from(TransferError::InvalidReference(4));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_account_error_mapping() {
        assert_eq!(
            ApiError::from(AccountError::InUse(1)).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(AccountError::Internal("db".into())).msg,
            INTERNAL_ERROR_MESSAGE
        );
    }
}
