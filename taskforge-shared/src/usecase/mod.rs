/// Use-case layer: deadline-bounded store access
///
/// Thin by design. Each use case wraps the matching store operation in
/// `tokio::time::timeout` so no persistence call can hang its caller
/// forever, and passes every store error through unchanged; the only
/// error this layer adds is `StoreError::Timeout`. The deadline is one
/// configured duration per deployment, decided here and nowhere else;
/// stores stay agnostic of deadlines.

use std::future::Future;
use std::time::Duration;

use crate::error::{StoreError, StoreResult};

pub mod tasks;
pub mod users;

pub use tasks::TaskUsecase;
pub use users::UserUsecase;

/// Fallback deadline when the deployment does not configure one
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs a store future against a deadline, mapping elapse to
/// `StoreError::Timeout`. The abandoned operation is not retried.
pub(crate) async fn bounded<T, F>(deadline: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_elapsed) => {
            tracing::warn!(timeout_ms = deadline.as_millis() as u64, "store operation timed out");
            Err(StoreError::Timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let result: StoreResult<()> =
            bounded(Duration::from_millis(50), std::future::pending()).await;
        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let ok: StoreResult<u32> = bounded(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err: StoreResult<u32> =
            bounded(Duration::from_secs(1), async { Err(StoreError::NotFound) }).await;
        assert!(matches!(err, Err(StoreError::NotFound)));
    }
}
