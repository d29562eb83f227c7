//! HTTP server

use std::net::SocketAddr;

use super::ServerState;

/// The HTTP server
pub struct Server {
    state: ServerState,
}

impl Server {
    pub fn new(state: ServerState) -> Self {
        Self { state }
    }

    /// Bind and serve until the process is stopped
    pub async fn run(self) -> anyhow::Result<()> {
        let app = crate::api::build_app(self.state.clone());
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!(%addr, environment = %self.state.config.environment, "HTTP server listening");
        axum::serve(listener, app).await?;
        Ok(())
    }
}
