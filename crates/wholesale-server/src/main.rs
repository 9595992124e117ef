//! Wholesale Server: application entry point.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use wholesale_auth::SessionVerifier;
use wholesale_platform::HttpGateway;
use wholesale_provisioning::ProvisioningService;
use wholesale_server::{AppState, ServerConfig, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wholesale=info,tower_http=info")),
        )
        .json()
        .init();

    tracing::info!("Starting wholesale server...");

    let config = ServerConfig::from_env()?;
    if config.session.api_secret.is_none() {
        tracing::warn!("WHOLESALE_API_SECRET is not set; storefront routes will fail");
    }

    let store = wholesale_db::open_mirror(&config.db).await?;

    let gateway = HttpGateway::new(config.platform.clone())?;
    let service = ProvisioningService::new(gateway, store);
    let state = AppState::new(service, SessionVerifier::new(config.session.clone()));
    let router = create_router(state, config.enable_cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Wholesale server listening");
    axum::serve(listener, router).await?;

    tracing::info!("Wholesale server stopped.");
    Ok(())
}
