//! Awaitable results for builder operations

use crate::error::{JwtError, JwtResult};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Result of a sign or verify running on a tokio task
///
/// Resolves to `JwtError::TaskEnded` if the task is dropped before it reports.
#[must_use = "an AsyncJwtResult does nothing unless awaited"]
pub struct AsyncJwtResult<T> {
    pending: oneshot::Receiver<JwtResult<T>>,
}

impl<T: Send + 'static> AsyncJwtResult<T> {
    /// Run `job` on the tokio runtime and wait for what it returns
    pub(crate) fn spawn<F>(job: F) -> Self
    where
        F: FnOnce() -> JwtResult<T> + Send + 'static,
    {
        let (sender, pending) = oneshot::channel();
        tokio::spawn(async move {
            // The caller may have dropped the result; nothing to report then.
            let _ = sender.send(job());
        });
        Self { pending }
    }
}

impl<T> Future for AsyncJwtResult<T> {
    type Output = JwtResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.pending)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(JwtError::TaskEnded)))
    }
}
