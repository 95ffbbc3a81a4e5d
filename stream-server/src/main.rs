mod config;
mod error;
mod routes;
mod state;

use catalog_http_client::CatalogClient;
use eyre::WrapErr;
use std::net::SocketAddr;
use std::sync::Arc;
use stream_matcher::StreamSelector;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Stream server starting...");

    let config = config::Config::from_env().wrap_err("Failed to load stream server config")?;
    tracing::info!(
        "Catalog search at {}, resolver at {}",
        config.provider.search_url,
        config.provider.resolver_url
    );

    let catalog =
        Arc::new(CatalogClient::new(&config.provider).wrap_err("Failed to build catalog client")?);
    let app_state = state::AppState {
        selector: StreamSelector::new(catalog.clone(), catalog, config.matching.clone()),
    };

    let app = routes::create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err("Failed to bind to address")?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("install SIGTERM handler");
    tokio::select! {
        _ = sigterm.recv() => {},
        _ = tokio::signal::ctrl_c() => {},
    }
}
