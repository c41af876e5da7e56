//! Bounded worker pool shared by every pipeline stage.
//!
//! One [`Workforce`] is created at process start and handed to each stage.
//! A stage calls [`Workforce::start`] to get a [`Runner`], schedules its tasks
//! with [`Runner::run`] and collects the outcome with [`Runner::wait`]. All
//! runners draw from the same slot pool, so the configured worker count caps
//! the number of concurrently blocking operations across the whole process.

use crate::error::{ReleaseError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Process-wide bounded task executor
#[derive(Debug, Clone)]
pub struct Workforce {
    slots: Arc<Semaphore>,
    num_workers: usize,
}

impl Workforce {
    /// Create a pool allowing `num_workers` tasks to run at once (minimum 1)
    pub fn new(num_workers: usize) -> Self {
        let num_workers = num_workers.max(1);
        Self {
            slots: Arc::new(Semaphore::new(num_workers)),
            num_workers,
        }
    }

    /// Number of concurrent slots
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Start a batch of tasks.
    ///
    /// Returns the runner and the token its tasks should observe. The token is a
    /// child of `parent`, so cancelling the parent reaches every task in the batch.
    pub fn start(&self, parent: &CancellationToken) -> (Runner, CancellationToken) {
        let token = parent.child_token();
        let runner = Runner {
            slots: self.slots.clone(),
            token: token.clone(),
            tasks: JoinSet::new(),
        };
        (runner, token)
    }

    /// Close the pool. Tasks still waiting for a slot fail with [`ReleaseError::Cancelled`].
    pub fn shutdown(&self) {
        self.slots.close();
    }
}

/// A batch of tasks scheduled on a [`Workforce`]
#[derive(Debug)]
pub struct Runner {
    slots: Arc<Semaphore>,
    token: CancellationToken,
    tasks: JoinSet<Result<()>>,
}

impl Runner {
    /// Schedule a task. Never blocks; the task waits for a free slot on its own.
    ///
    /// A task that is cancelled before it gets a slot is never polled.
    pub fn run<F>(&mut self, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let slots = self.slots.clone();
        let token = self.token.clone();
        self.tasks.spawn(async move {
            let _permit = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(ReleaseError::Cancelled),
                permit = slots.acquire_owned() => permit.map_err(|_| ReleaseError::Cancelled)?,
            };
            if token.is_cancelled() {
                return Err(ReleaseError::Cancelled);
            }
            task.await
        });
    }

    /// Number of tasks scheduled and not yet collected
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are pending
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every scheduled task and return the first failure.
    ///
    /// A failing task does not stop its siblings. A real error is preferred over
    /// [`ReleaseError::Cancelled`] when both occurred.
    pub async fn wait(mut self) -> Result<()> {
        let mut first_err: Option<ReleaseError> = None;

        while let Some(joined) = self.tasks.join_next().await {
            let Err(err) = joined.map_err(ReleaseError::from).and_then(|r| r) else {
                continue;
            };

            let replace = match &first_err {
                None => true,
                Some(ReleaseError::Cancelled) => !matches!(err, ReleaseError::Cancelled),
                Some(_) => false,
            };
            if replace {
                first_err = Some(err);
            } else {
                log::debug!("Additional task failure: {err}");
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn concurrency_is_bounded_by_worker_count() {
        let workforce = Workforce::new(2);
        let root = CancellationToken::new();
        let (mut runner, _token) = workforce.start(&root);

        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..8 {
            let running = running.clone();
            let peak = peak.clone();
            runner.run(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            });
        }

        runner.wait().await.unwrap();
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn failure_is_reported_after_siblings_finish() {
        let workforce = Workforce::new(4);
        let root = CancellationToken::new();
        let (mut runner, _token) = workforce.start(&root);
        let completed = Arc::new(AtomicUsize::new(0));

        runner.run(async {
            Err(CliError::InvalidArguments {
                reason: "boom".into(),
            }
            .into())
        });
        for _ in 0..3 {
            let completed = completed.clone();
            runner.run(async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                completed.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        let err = runner.wait().await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(completed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cancelled_tasks_never_start() {
        let workforce = Workforce::new(1);
        let root = CancellationToken::new();
        let (mut runner, _token) = workforce.start(&root);
        let started = Arc::new(AtomicUsize::new(0));

        root.cancel();
        for _ in 0..3 {
            let started = started.clone();
            runner.run(async move {
                started.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        let err = runner.wait().await.unwrap_err();
        assert!(matches!(err, ReleaseError::Cancelled));
        assert_eq!(started.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn in_flight_tasks_observe_cancellation() {
        let workforce = Workforce::new(2);
        let root = CancellationToken::new();
        let (mut runner, token) = workforce.start(&root);

        for _ in 0..2 {
            let token = token.clone();
            runner.run(async move {
                tokio::select! {
                    _ = token.cancelled() => Err(ReleaseError::Cancelled),
                    _ = tokio::time::sleep(Duration::from_secs(60)) => Ok(()),
                }
            });
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
        root.cancel();
        let err = tokio::time::timeout(Duration::from_secs(5), runner.wait())
            .await
            .expect("wait should return promptly after cancellation")
            .unwrap_err();
        assert!(matches!(err, ReleaseError::Cancelled));
    }

    #[tokio::test]
    async fn empty_batch_succeeds() {
        let workforce = Workforce::new(3);
        let (runner, _token) = workforce.start(&CancellationToken::new());
        assert!(runner.is_empty());
        runner.wait().await.unwrap();
    }
}
