//! Server setup and lifecycle management.

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::router::create_router;
use crate::state::AppState;
use linden_routing::RouteTable;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Linden RPC server: a frozen route table behind the wire contract.
pub struct Server {
    config: ServiceConfig,
    table: Arc<RouteTable>,
}

impl Server {
    pub fn new(config: ServiceConfig, table: RouteTable) -> Self {
        Self {
            config,
            table: Arc::new(table),
        }
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(self) -> ServiceResult<()> {
        let addr = self.config.server.listen_addr;
        let state = AppState::new(self.table.clone());
        let uptime_state = state.clone();

        let mut app = create_router(state);
        if self.config.server.enable_cors {
            app = app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Linden RPC listening on {}", addr);
        tracing::info!("Serving {} resolver route(s)", self.table.len());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServiceError::Server(e.to_string()))?;

        tracing::info!("Linden RPC shutting down after {}", uptime_state.uptime());

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
