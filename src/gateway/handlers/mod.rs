//! HTTP handlers

pub mod health;
pub mod transfer;
pub mod user;

pub use health::{HealthResponse, health_check};
pub use transfer::{create_transfer, list_transfers};
pub use user::{create_user, delete_user, list_users, update_user};

use axum::http::Uri;

use super::types::{ApiError, error_codes};

/// Fallback for unknown routes
pub async fn route_not_found(uri: Uri) -> ApiError {
    tracing::debug!(path = %uri.path(), "Unknown route");
    ApiError::new(
        axum::http::StatusCode::NOT_FOUND,
        error_codes::ROUTE_NOT_FOUND,
        "Ruta desconocida.",
    )
}
