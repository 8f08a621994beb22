use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use salon::config::AppConfig;
use salon::handlers;
use salon::services::gateway::{
    FallbackGateway, LocalGateway, PersistenceGateway, RemoteGateway,
};
use salon::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let local = LocalGateway::open(&config.database_url)?;

    let gateway: Box<dyn PersistenceGateway> = if config.uses_remote() {
        tracing::info!(
            "using remote booking backend (url: {}), local store as fallback",
            config.remote_api_url
        );
        let token = Some(config.remote_api_token.clone());
        let remote = RemoteGateway::new(
            config.remote_api_url.clone(),
            token,
            Duration::from_secs(config.remote_timeout_secs),
        )?;
        Box::new(FallbackGateway::new(Box::new(remote), Box::new(local)))
    } else {
        tracing::info!("using local booking store (path: {})", config.database_url);
        Box::new(local)
    };

    if config.admin_token == "changeme" {
        tracing::warn!("ADMIN_TOKEN is not set; admin API uses the default token");
    }

    let state = Arc::new(AppState {
        gateway,
        config: config.clone(),
    });

    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
