use std::fmt::Display;
use std::future::Future;

use tokio::task::JoinHandle;

/// Runs a best-effort call in the background.
///
/// A failure is logged and turned into `None`; it never reaches the primary
/// flow. Callers may await the handle to pick up the result, or drop it.
pub fn detach<T, E, F>(label: &'static str, future: F) -> JoinHandle<Option<T>>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    tokio::spawn(async move {
        match future.await {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(
                    task = label,
                    error = %err,
                    "Background call failed, result discarded"
                );
                None
            }
        }
    })
}
