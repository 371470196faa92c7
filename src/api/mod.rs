//! REST API over the dimensioning engine and the tariff directory.
//!
//! Routes:
//! - `POST /dimensioning`: size a project
//! - `GET /regions/{region}/localities`: localities with their own tariff
//! - `GET /tariffs/{region}?locality=`: resolved distributor tariff
//! - `GET /config`: active engine configuration

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::dimension::Engine;
use crate::tables::TariffTable;

pub use types::{ErrorResponse, TariffQuery};

/// Immutable application state shared across all request handlers.
///
/// The engine and tables never change after startup, so the state is wrapped
/// in `Arc` without locks.
pub struct AppState {
    /// Engine with the loaded configuration.
    pub engine: Engine,
    /// Tariff and locality directory.
    pub tariffs: TariffTable,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/dimensioning", post(handlers::post_dimensioning))
        .route("/regions/{region}/localities", get(handlers::get_localities))
        .route("/tariffs/{region}", get(handlers::get_tariff))
        .route("/config", get(handlers::get_config))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the server
/// fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
