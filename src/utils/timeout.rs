// src/utils/timeout.rs
use std::future::Future;
use std::time::Duration;

use crate::error::{DossierError, DossierResult};

/// Run a fallible call under a deadline, reporting expiry as `TimeoutError`
pub async fn with_timeout<T, F>(operation: &str, limit: Duration, call: F) -> DossierResult<T>
where
    F: Future<Output = DossierResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(DossierError::TimeoutError {
            operation: operation.to_string(),
            seconds: limit.as_secs(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_result_passes_through() {
        let ok = with_timeout("noop", Duration::from_secs(1), async { Ok::<_, DossierError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = with_timeout("noop", Duration::from_secs(1), async {
            Err::<u8, _>(DossierError::NetworkError("reset".to_string()))
        })
        .await;
        assert!(matches!(err, Err(DossierError::NetworkError(_))));
    }

    #[tokio::test]
    async fn test_expiry_is_timeout_error() {
        let result = with_timeout("registry lookup", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<_, DossierError>(())
        })
        .await;

        match result {
            Err(DossierError::TimeoutError { operation, .. }) => assert_eq!(operation, "registry lookup"),
            other => panic!("expected a timeout, got {:?}", other),
        }
    }
}
