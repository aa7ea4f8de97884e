use crate::common::DatabaseError;
use sea_orm::DatabaseConnection;
use tracing::debug;

/// Readiness probe: a round-trip to the server.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    debug!("Running PostgreSQL health check");

    db.ping().await.map_err(|e| {
        DatabaseError::HealthCheckFailed(format!("PostgreSQL health check failed: {}", e))
    })
}
