/// Tile Generation Workers
///
/// The streamer hands every height and mesh request to a [`TaskSpawner`].
/// Jobs are independent and CPU-bound; results travel back through the
/// streamer's result queues, never through the spawner.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::constants::workers::{RESERVED_CORES, WORKER_STACK_SIZE};

/// A unit of tile work
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs off (or on) the driver thread
pub trait TaskSpawner: Send + Sync {
    fn spawn(&self, job: Job);
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerPoolError {
    #[error("Failed to build tile worker pool: {0}")]
    Build(#[from] rayon::ThreadPoolBuildError),
}

/// Job counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpawnerStats {
    pub jobs_submitted: u64,
    pub jobs_completed: u64,
}

#[derive(Debug, Default)]
struct JobCounters {
    submitted: AtomicU64,
    completed: AtomicU64,
}

impl JobCounters {
    fn snapshot(&self) -> SpawnerStats {
        SpawnerStats {
            jobs_submitted: self.submitted.load(Ordering::Relaxed),
            jobs_completed: self.completed.load(Ordering::Relaxed),
        }
    }
}

/// Dedicated rayon pool for tile generation
pub struct RayonSpawner {
    pool: ThreadPool,
    counters: Arc<JobCounters>,
}

impl RayonSpawner {
    /// One worker per core, minus the cores reserved for the driver
    pub fn new() -> Result<Self, WorkerPoolError> {
        let threads = num_cpus::get().saturating_sub(RESERVED_CORES).max(1);
        Self::with_threads(threads)
    }

    pub fn with_threads(threads: usize) -> Result<Self, WorkerPoolError> {
        let threads = threads.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("tile-gen-{}", idx))
            .stack_size(WORKER_STACK_SIZE)
            .build()?;

        log::info!("[RayonSpawner::new] Started {} tile generation workers", threads);

        Ok(Self {
            pool,
            counters: Arc::new(JobCounters::default()),
        })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn stats(&self) -> SpawnerStats {
        self.counters.snapshot()
    }
}

impl TaskSpawner for RayonSpawner {
    fn spawn(&self, job: Job) {
        self.counters.submitted.fetch_add(1, Ordering::Relaxed);
        let counters = Arc::clone(&self.counters);
        self.pool.spawn(move || {
            job();
            counters.completed.fetch_add(1, Ordering::Relaxed);
        });
    }
}

/// Runs each job to completion on the calling thread.
///
/// Results land in the queues immediately and are delivered on the next
/// drain, which makes streaming deterministic for single-threaded hosts.
#[derive(Debug, Default)]
pub struct InlineSpawner {
    counters: JobCounters,
}

impl InlineSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> SpawnerStats {
        self.counters.snapshot()
    }
}

impl TaskSpawner for InlineSpawner {
    fn spawn(&self, job: Job) {
        self.counters.submitted.fetch_add(1, Ordering::Relaxed);
        job();
        self.counters.completed.fetch_add(1, Ordering::Relaxed);
    }
}

impl<S: TaskSpawner + ?Sized> TaskSpawner for Arc<S> {
    fn spawn(&self, job: Job) {
        (**self).spawn(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_inline_runs_immediately() {
        let spawner = InlineSpawner::new();
        let hits = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let hits = Arc::clone(&hits);
            spawner.spawn(Box::new(move || hits.lock().push(i)));
        }
        assert_eq!(*hits.lock(), vec![0, 1, 2]);
        assert_eq!(
            spawner.stats(),
            SpawnerStats {
                jobs_submitted: 3,
                jobs_completed: 3
            }
        );
    }

    #[test]
    fn test_rayon_runs_jobs_on_named_workers() {
        let spawner = RayonSpawner::with_threads(2).unwrap();
        assert_eq!(spawner.num_threads(), 2);

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            spawner.spawn(Box::new(move || {
                let name = std::thread::current().name().map(str::to_string);
                tx.send(name).unwrap();
            }));
        }

        for _ in 0..4 {
            let name = rx.recv_timeout(Duration::from_secs(10)).unwrap();
            assert!(name.unwrap().starts_with("tile-gen-"));
        }
        assert_eq!(spawner.stats().jobs_submitted, 4);
    }
}
