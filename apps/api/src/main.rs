//! Catalog API - product catalog REST server

use std::sync::Arc;
use std::time::Duration;

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use storage::DiskBlobStore;
use tower_http::services::ServeDir;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.url());

    // The client connects lazily: an unreachable server is reported but
    // does not stop startup, requests fail until it comes up.
    let mongo_client = database::mongodb::connect_lazy(&config.mongodb).await?;
    if database::mongodb::check_health(&mongo_client).await {
        info!(
            "Successfully connected to MongoDB database: {}",
            config.mongodb.database()
        );
    } else {
        warn!("MongoDB is not reachable yet; continuing startup");
    }
    let db = mongo_client.database(config.mongodb.database());

    let blobs = Arc::new(DiskBlobStore::new(&config.storage));

    let api_routes = api::routes(&db, blobs.clone());
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    let uploads_path = if config.storage.public_prefix.starts_with('/') {
        config.storage.public_prefix.clone()
    } else {
        format!("/{}", config.storage.public_prefix)
    };

    let app = router
        .merge(health_router(config.app))
        .merge(api::health::router(mongo_client.clone()))
        .merge(api::upload::router(blobs))
        .nest_service(&uploads_path, ServeDir::new(&config.storage.root));

    info!("Starting Catalog API on port {}", config.server.port);

    create_production_app(
        app,
        &config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
