use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use catalog_service::app::cors_layer;
use catalog_service::config::load_service_config;
use catalog_service::metrics::ServiceMetrics;
use catalog_service::store::{CatalogStore, MemoryStore, PgStore, UserStore};
use catalog_service::{build_router, AppState};
use common_auth::{SigningKeyStore, TokenCodec};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_service_config()?;

    let (users, catalog): (Arc<dyn UserStore>, Arc<dyn CatalogStore>) = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(url)
                .await
                .context("Failed to connect to DATABASE_URL")?;
            let store = Arc::new(PgStore::new(pool));
            store.migrate().await.context("Failed to run migrations")?;
            info!("using postgres store");
            let users: Arc<dyn UserStore> = store.clone();
            let catalog: Arc<dyn CatalogStore> = store;
            (users, catalog)
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            let users: Arc<dyn UserStore> = store.clone();
            let catalog: Arc<dyn CatalogStore> = store;
            (users, catalog)
        }
    };

    // One key per process; restarting invalidates every issued token.
    let keys = Arc::new(SigningKeyStore::generate());
    let codec = Arc::new(TokenCodec::new(config.token.clone(), keys));
    let metrics = Arc::new(ServiceMetrics::new()?);

    let state = AppState::new(users, catalog, codec, metrics);
    let app = build_router(state).layer(cors_layer(&config.cors_allowed_origins));

    let ip: std::net::IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST '{}'", config.host))?;
    let addr = SocketAddr::from((ip, config.port));

    info!(%addr, ttl_seconds = config.token.ttl_seconds, "starting catalog-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
