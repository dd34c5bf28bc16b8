//! HTTP gateway
//!
//! Routes, request logging and server lifecycle. Handlers translate between
//! JSON and the account/transfer services; they hold no state of their own.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    body::Body,
    http::Request,
    middleware::{Next, from_fn},
    response::Response,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;

use state::AppState;

/// Access log: one line per request
async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Users
        .route("/usuarios", get(handlers::list_users))
        .route(
            "/usuario",
            post(handlers::create_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        // Transfers
        .route("/transferencia", post(handlers::create_transfer))
        .route("/transferencias", get(handlers::list_transfers))
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(handlers::route_not_found)
        .layer(from_fn(log_requests))
        .with_state(state)
}

/// Serve until `shutdown` resolves, then drain in-flight requests
pub async fn run_server(
    addr: &str,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!(store = state.store.name(), "Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}
