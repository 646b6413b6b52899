//! Readiness endpoint
//!
//! `/health` (liveness) comes from `axum_helpers::health_router`; this
//! adds `/ready`, which actually pings MongoDB.

use axum::http::StatusCode;
use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use mongodb::Client;
use serde_json::Value;

async fn ready(
    State(client): State<Client>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "mongodb",
        Box::pin(async {
            if database::mongodb::check_health(&client).await {
                Ok(())
            } else {
                Err("MongoDB ping failed".to_string())
            }
        }),
    )];

    run_health_checks(checks).await
}

pub fn router(client: Client) -> Router {
    Router::new().route("/ready", get(ready)).with_state(client)
}
