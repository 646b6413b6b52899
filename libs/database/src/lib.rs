//! Database library providing the MongoDB connector and utilities.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - Configuration support with `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb;
//!
//! let config = mongodb::MongoConfig::with_database("mongodb://localhost:27017", "mydb");
//! let client = mongodb::connect_lazy(&config).await?;
//! let db = client.database(config.database());
//! let collection = db.collection::<Document>("items");
//! ```

#[cfg(feature = "mongodb")]
pub mod mongodb;
