//! `RoomcastServer` builder and serve loop.
//!
//! This is the entry point for running a relay: it owns the listener, the
//! router, and the shared room directory every request handler sees.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use roomcast_room::RoomDirectory;
use tokio::net::TcpListener;

use crate::RoomcastError;
use crate::routes::{self, AppState};

/// Builder for configuring and starting a Roomcast server.
///
/// # Example
///
/// ```rust,ignore
/// let server = RoomcastServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct RoomcastServerBuilder {
    bind_addr: String,
}

impl RoomcastServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and assembles the router.
    pub async fn build(self) -> Result<RoomcastServer, RoomcastError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "roomcast listener bound");

        let state = AppState {
            directory: Arc::new(RoomDirectory::new()),
        };

        Ok(RoomcastServer {
            listener,
            app: routes::router(state),
        })
    }
}

impl Default for RoomcastServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Roomcast relay server.
///
/// Call [`run()`](Self::run) to start serving requests.
pub struct RoomcastServer {
    listener: TcpListener,
    app: Router,
}

impl RoomcastServer {
    /// Creates a new builder.
    pub fn builder() -> RoomcastServerBuilder {
        RoomcastServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until the process is terminated.
    pub async fn run(self) -> Result<(), RoomcastError> {
        tracing::info!("roomcast server running");
        axum::serve(self.listener, self.app).await?;
        Ok(())
    }
}
