use std::sync::Arc;

use cinegraph_api::{
    config::Config,
    db::{create_redis_client, Cache},
    routes::{create_router, AppState},
    services::{genres::load_genre_map, providers::TmdbProvider, CatalogProvider},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinegraph_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client);

    let catalog: Option<Arc<dyn CatalogProvider>> = match &config.tmdb_api_key {
        Some(api_key) => Some(Arc::new(TmdbProvider::new(
            cache,
            api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
        ))),
        None => {
            tracing::warn!("TMDB_API_KEY is not set, recommendations are disabled");
            None
        }
    };

    let genres = load_genre_map(catalog.clone()).await;
    let state = Arc::new(AppState::new(catalog, genres, config.ranking_settings()));
    let app = create_router(state, &config.cors_origins);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
