//! Axum HTTP surfaces for the manager and the workers

use std::net::SocketAddr;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::error::CrackError;
use crate::models::ErrorResponse;

mod manager;
mod worker;

pub use manager::manager_router;
pub use worker::worker_router;

impl IntoResponse for CrackError {
    fn into_response(self) -> Response {
        let status = match &self {
            CrackError::Validation(_) | CrackError::Overflow { .. } => StatusCode::BAD_REQUEST,
            CrackError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse { error: self.to_string() };
        (status, Json(body)).into_response()
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Bind `addr` and serve `router` until Ctrl+C
pub async fn serve(addr: &str, router: axum::Router) -> eyre::Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| eyre::eyre!("Invalid bind address '{}': {}", addr, e))?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutting down gracefully");
}
