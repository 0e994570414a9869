//! Cancellable deferred work.
//!
//! Stands in for a network round trip: wait a fixed latency, then run the
//! completion. Cancelling the token at any point drops the work.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub fn spawn_deferred<F, Fut>(
    runtime: &Handle,
    token: CancellationToken,
    delay: Duration,
    work: F,
) -> JoinHandle<()>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    runtime.spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::trace!("Deferred task cancelled");
            }
            _ = async {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                work().await;
            } => {}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn runs_after_delay() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let handle = spawn_deferred(
            &Handle::current(),
            CancellationToken::new(),
            Duration::from_millis(500),
            move || async move {
                flag.store(true, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(!ran.load(Ordering::SeqCst));

        handle.await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_delay_never_runs() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let token = CancellationToken::new();
        let handle = spawn_deferred(
            &Handle::current(),
            token.clone(),
            Duration::from_secs(1),
            move || async move {
                flag.store(true, Ordering::SeqCst);
            },
        );

        token.cancel();
        handle.await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }
}
