use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

enum RefreshCommand {
    Now,
}

/// Periodic re-fetch bound to the lifetime of its [`RefreshHandle`].
pub struct Refresher;

impl Refresher {
    /// Runs `job` right away and then every `period`, publishing each result.
    ///
    /// Polling stops when the handle is cancelled or dropped; a fetch in
    /// flight at that point is abandoned and its result discarded.
    pub fn spawn<T, F, Fut>(period: Duration, initial: T, job: F) -> RefreshHandle<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send,
    {
        let (state_tx, state_rx) = watch::channel(initial);
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    cmd = cmd_rx.recv() => match cmd {
                        Some(RefreshCommand::Now) => ticker.reset(),
                        None => break,
                    },
                }

                let value = job().await;
                if state_tx.send(value).is_err() {
                    break;
                }
            }

            tracing::debug!("Refresh loop stopped");
        });

        RefreshHandle {
            state: state_rx,
            commands: cmd_tx,
            task,
        }
    }
}

pub struct RefreshHandle<T> {
    state: watch::Receiver<T>,
    commands: mpsc::UnboundedSender<RefreshCommand>,
    task: JoinHandle<()>,
}

impl<T: Clone> RefreshHandle<T> {
    pub fn current(&self) -> T {
        self.state.borrow().clone()
    }
}

impl<T> RefreshHandle<T> {
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.state.clone()
    }

    /// Fetches immediately and restarts the period from now
    pub fn refresh_now(&self) {
        let _ = self.commands.send(RefreshCommand::Now);
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.task.is_finished()
    }
}

impl<T> Drop for RefreshHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_job(counter: Arc<AtomicUsize>) -> impl Fn() -> std::future::Ready<usize> {
        move || std::future::ready(counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_on_every_period() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = Refresher::spawn(Duration::from_secs(5), 0, counting_job(counter.clone()));

        time::sleep(Duration::from_secs(11)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(handle.current(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_polling() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = Refresher::spawn(Duration::from_secs(5), 0, counting_job(counter.clone()));

        time::sleep(Duration::from_secs(6)).await;
        handle.cancel();
        let seen = counter.load(Ordering::SeqCst);

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(counter.load(Ordering::SeqCst), seen);
        assert!(handle.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = Refresher::spawn(Duration::from_secs(5), 0, counting_job(counter.clone()));
        let mut updates = handle.subscribe();

        updates.changed().await.unwrap();
        drop(handle);
        let seen = counter.load(Ordering::SeqCst);

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(counter.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_now_fetches_early() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = Refresher::spawn(Duration::from_secs(60), 0, counting_job(counter.clone()));
        let mut updates = handle.subscribe();

        updates.changed().await.unwrap();
        handle.refresh_now();
        updates.changed().await.unwrap();

        assert_eq!(*updates.borrow(), 2);
    }
}
