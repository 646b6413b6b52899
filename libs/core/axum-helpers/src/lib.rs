//! Shared HTTP plumbing for axum-based APIs.
//!
//! This crate provides the cross-cutting pieces every API binary needs:
//! - Standardized error types and responses ([`AppError`], [`ErrorResponse`])
//! - Server bootstrap with OpenAPI docs and common middleware
//! - Health and readiness endpoint helpers
//! - Graceful shutdown coordination

pub mod errors;
pub mod http;
pub mod server;

// Re-export commonly used types
pub use errors::{AppError, ErrorResponse};
pub use server::{create_app, create_production_app, create_router, health_router};
