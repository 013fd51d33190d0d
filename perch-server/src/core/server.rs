//! Server Implementation
//!
//! HTTP 服务器 + TCP 消息总线的启动和管理

use crate::core::{Config, Result, ServerState};

/// Perch Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for sharing with in-process clients)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config)?,
        };

        // Start background tasks (message handler)
        state.start_background_tasks();

        // Start Message Bus TCP server
        let bus = state.message_bus().clone();
        tokio::spawn(async move {
            if let Err(e) = bus.start_tcp_server().await {
                tracing::error!("Message Bus TCP server failed: {}", e);
            }
        });

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Perch Seat Server starting on {}", addr);
        tracing::info!(
            "Message bus: tcp://0.0.0.0:{}",
            self.config.message_tcp_port
        );

        let app = crate::api::router().with_state(state.clone());
        let listener = tokio::net::TcpListener::bind(addr).await?;

        let shutdown_bus = state.message_bus().clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
                shutdown_bus.shutdown();
            })
            .await?;

        Ok(())
    }
}
