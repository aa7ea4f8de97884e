//! Application-specific health check handlers with real database/redis checks.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// Readiness check endpoint that actually checks the database, and Redis when
/// it is configured.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let mut checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&state.db)
                .await
                .map_err(|e| format!("Database ping failed: {}", e))
        }),
    )];

    if let Some(redis) = &state.redis {
        let mut redis = redis.clone();
        checks.push((
            "redis",
            Box::pin(async move {
                database::redis::check_health(&mut redis)
                    .await
                    .map_err(|e| format!("Redis ping failed: {}", e))
            }),
        ));
    }

    run_health_checks(checks).await.into_response()
}
