use roomcast::{RoomcastError, RoomcastServer};

#[tokio::main]
async fn main() -> Result<(), RoomcastError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("roomcast=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = std::env::var("ROOMCAST_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let server = RoomcastServer::builder().bind(&addr).build().await?;
    tracing::info!(addr = %server.local_addr()?, "roomcast listening");
    server.run().await
}
