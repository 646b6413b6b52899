use mongodb::{Client, options::ClientOptions};
use std::time::Duration;
use tracing::info;

use super::MongoConfig;

/// Error type for MongoDB operations
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

async fn client_options(config: &MongoConfig) -> Result<ClientOptions, MongoError> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    Ok(options)
}

/// Build a MongoDB client without verifying connectivity.
///
/// The driver connects on first use, so a client built here stays valid
/// even when the server is unreachable at startup; individual operations
/// fail instead. Pair with [`super::check_health`] to report initial
/// reachability.
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, connect_lazy};
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "mydb");
/// let client = connect_lazy(&config).await?;
/// ```
pub async fn connect_lazy(config: &MongoConfig) -> Result<Client, MongoError> {
    let options = client_options(config).await?;
    let client = Client::with_options(options)?;

    info!("MongoDB client configured for {}", config.url);
    Ok(client)
}

/// Connect to MongoDB and verify the connection with a lightweight ping.
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, connect};
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "mydb");
/// let client = connect(&config).await?;
/// let db = client.database(config.database());
/// ```
pub async fn connect(config: &MongoConfig) -> Result<Client, MongoError> {
    info!("Attempting to connect to MongoDB at {}", config.url);

    let client = connect_lazy(config).await?;

    // Verify connection by listing databases (lightweight ping)
    client
        .list_database_names()
        .await
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to MongoDB");
    Ok(client)
}
