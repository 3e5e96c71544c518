// src/engine/parallel.rs
use std::future::Future;
use std::sync::Arc;
use indicatif::ProgressBar;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Runs one async job per item with bounded concurrency.
///
/// Results come back in input order no matter which job finishes first.
/// A slot is `None` when its job never started because the run was
/// cancelled, or when the job panicked.
pub struct ParallelExecutor {
    max_concurrent_tasks: usize,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl ParallelExecutor {
    /// Create a new parallel executor
    pub fn new(max_concurrent_tasks: usize, cancel: CancellationToken) -> Self {
        let max_concurrent_tasks = max_concurrent_tasks.max(1);
        Self {
            max_concurrent_tasks,
            semaphore: Arc::new(Semaphore::new(max_concurrent_tasks)),
            cancel,
        }
    }

    pub fn max_concurrent_tasks(&self) -> usize {
        self.max_concurrent_tasks
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Execute `job` for every item and reassemble the results by index
    pub async fn execute<T, R, F, Fut>(
        &self,
        items: Vec<T>,
        job: F,
        progress: &ProgressBar,
    ) -> Vec<Option<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let total = items.len();
        if total == 0 {
            return Vec::new();
        }

        info!("Executing {} jobs with max concurrency {}", total, self.max_concurrent_tasks);

        let job = Arc::new(job);
        let mut set = JoinSet::new();

        for (index, item) in items.into_iter().enumerate() {
            let semaphore = self.semaphore.clone();
            let cancel = self.cancel.clone();
            let job = job.clone();

            set.spawn(async move {
                // A closed semaphore means the executor is gone; treat like cancellation
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return (index, None),
                };

                if cancel.is_cancelled() {
                    debug!("Skipping job {} after cancellation", index);
                    return (index, None);
                }

                (index, Some(job(item).await))
            });
        }

        let mut slots: Vec<Option<R>> = (0..total).map(|_| None).collect();

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result)) => {
                    slots[index] = result;
                    progress.inc(1);
                }
                Err(e) => {
                    error!("Job execution failed: {}", e);
                    progress.inc(1);
                }
            }
        }

        debug!(
            "Completed {}/{} jobs",
            slots.iter().filter(|slot| slot.is_some()).count(),
            total
        );

        slots
    }
}
