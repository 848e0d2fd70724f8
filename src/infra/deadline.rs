// src/infra/deadline.rs — Bounded external operations

use std::future::Future;
use std::time::Duration;

use crate::infra::errors::{Result, WxDraftError};

/// Run `fut` with an upper bound. On elapse the future is dropped, which
/// aborts any in-flight HTTP request it owns.
pub async fn with_deadline<T, F>(operation: &'static str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, secs = limit.as_secs(), "deadline exceeded");
            Err(WxDraftError::Timeout {
                operation,
                secs: limit.as_secs(),
            })
        }
    }
}
