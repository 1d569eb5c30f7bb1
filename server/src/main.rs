use std::{net::SocketAddr, sync::Arc};

use account_command_handlers::Authenticator;
use account_http::{GoogleProvider, OAuthSettings};
use archivist::{ArchivistConfig, Storage, build_router};
use common_errors::ErrorVerbosity;
use session_tokens::TokenIssuer;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ArchivistConfig::init()?;
    if config.is_development() {
        ErrorVerbosity::Development
    }
    else {
        ErrorVerbosity::Concealed
    }
    .install();

    let catalog = resource_schemas::catalog();
    let storage = Storage::open(&config, &catalog).await?;

    let tokens =
        TokenIssuer::new(&config.jwt_secret, config.token_expiry_minutes);
    let authenticator = Authenticator::new(storage.accounts.clone(), tokens);

    let oauth = match config.google_oauth()? {
        Some(google) => {
            info!("Google OAuth login enabled");
            Some(OAuthSettings {
                provider: Arc::new(GoogleProvider::new(google)?),
                frontend_url: config.frontend_url()?,
            })
        }
        None => None,
    };

    let app = build_router(
        catalog,
        storage.documents.clone(),
        authenticator,
        oauth,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Archivist server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
