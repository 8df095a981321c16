pub mod bank_account_service;
pub mod paystack_service;
pub mod transaction_service;
pub mod wallet_service;

use crate::error::ApiError;
use std::time::Duration;
use tracing::warn;

/// Bound on optimistic-lock retries before the conflict is surfaced.
pub(crate) const VERSION_RETRY_LIMIT: u32 = 3;

/// Re-runs `op` on `VersionConflict` with a short backoff. Each attempt
/// re-reads fresh state, so losing the race is recoverable; past the bound
/// the failure surfaces as `Conflict`.
pub(crate) async fn with_version_retry<T, F>(op_name: &str, mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Result<T, ApiError>,
{
    let mut attempt: u32 = 0;
    loop {
        match op() {
            Err(ApiError::VersionConflict(msg)) => {
                attempt += 1;
                if attempt >= VERSION_RETRY_LIMIT {
                    warn!("{}: giving up after {} version conflicts", op_name, attempt);
                    return Err(ApiError::Conflict(msg));
                }
                tokio::time::sleep(Duration::from_millis(10 * u64::from(attempt))).await;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn version_conflicts_retry_until_the_bound_then_surface_as_conflict() {
        let mut attempts = 0u32;
        let err = with_version_retry("test.op", || -> Result<(), ApiError> {
            attempts += 1;
            Err(ApiError::VersionConflict("lost the race".into()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(attempts, VERSION_RETRY_LIMIT);
    }

    #[tokio::test]
    async fn a_conflict_that_clears_on_retry_succeeds() {
        let mut attempts = 0u32;
        let value = with_version_retry("test.op", || {
            attempts += 1;
            if attempts == 1 {
                Err(ApiError::VersionConflict("lost the race".into()))
            } else {
                Ok(attempts)
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 2);
    }

    #[tokio::test]
    async fn non_conflict_errors_are_not_retried() {
        let mut attempts = 0u32;
        let err = with_version_retry("test.op", || -> Result<(), ApiError> {
            attempts += 1;
            Err(ApiError::NotFound("missing".into()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(attempts, 1);
    }
}
