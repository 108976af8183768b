use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::Client;
use tokio::time::timeout;
use tracing::info;

use crate::error::AppError;
use crate::infra::StoreError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Open a managed connection. A bad URL is a configuration error; an
/// unreachable server is reported as unavailable so callers can fall back.
pub async fn connect(redis_url: &str) -> Result<ConnectionManager, AppError> {
    let client = Client::open(redis_url)
        .map_err(|err| AppError::config(format!("Invalid REDIS_URL: {err}")))?;

    let manager = timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
        .await
        .map_err(|_| StoreError::Unavailable("Redis connect timed out".to_string()))
        .and_then(|res| res.map_err(StoreError::from))
        .map_err(|err| {
            AppError::unavailable(crate::errors::ErrorCode::StoreUnavailable, err.to_string())
        })?;

    info!("Connected to Redis");
    Ok(manager)
}
