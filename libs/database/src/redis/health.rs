use crate::common::DatabaseError;
use redis::aio::ConnectionManager;
use tracing::debug;

/// Readiness probe: `PING` must answer `PONG`.
pub async fn check_health(conn: &mut ConnectionManager) -> Result<(), DatabaseError> {
    debug!("Running Redis health check");

    let pong: String = redis::cmd("PING")
        .query_async(conn)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("Redis health check failed: {}", e)))?;

    if pong == "PONG" {
        Ok(())
    } else {
        Err(DatabaseError::HealthCheckFailed(format!(
            "Redis answered PING with {}",
            pong
        )))
    }
}
