//! Axum HTTP server for the engine.

use crate::error::RpcError;
use crate::handlers::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

/// The full API surface. Split out from [`RpcServer`] so tests can drive it
/// without binding a socket.
pub fn router(orch: AppState) -> Router {
    Router::new()
        .route("/v1/gates/:slug/view", post(handlers::record_view))
        .route("/v1/gates/:slug/submissions", post(handlers::submit))
        .route("/v1/gates/:slug/funnel", get(handlers::funnel))
        .route("/v1/submissions/:id/steps", post(handlers::begin_step))
        .route("/v1/steps/callback", get(handlers::step_callback))
        .route(
            "/v1/submissions/:id/credentials",
            post(handlers::issue_credential),
        )
        .route("/v1/downloads", post(handlers::redeem))
        .route("/v1/contacts/:email/consent", get(handlers::consent_timeline))
        .layer(CorsLayer::permissive())
        .with_state(orch)
}

pub struct RpcServer {
    addr: SocketAddr,
}

impl RpcServer {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn start(
        &self,
        orch: AppState,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RpcError> {
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Internal(format!("bind {}: {e}", self.addr)))?;
        tracing::info!(addr = %self.addr, "rpc server listening");
        axum::serve(listener, router(orch))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Internal(e.to_string()))
    }
}
