//! Shutdown signal helpers

use tokio::sync::watch;

/// Resolve once shutdown has been requested
///
/// If every sender is gone no request can arrive any more, so this never
/// resolves.
pub async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Whether shutdown has already been requested
pub fn is_shutdown(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_resolves_after_send() {
        let (tx, mut rx) = watch::channel(false);
        assert!(!is_shutdown(&rx));

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), shutdown_requested(&mut rx))
            .await
            .unwrap();
        assert!(is_shutdown(&rx));
    }

    #[tokio::test]
    async fn test_dropped_sender_never_resolves() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);

        let waited =
            tokio::time::timeout(Duration::from_millis(50), shutdown_requested(&mut rx)).await;
        assert!(waited.is_err());
    }
}
