//! Two-phase dispatch: compute off-thread, apply on the owning thread.
//!
//! Every operation that derives a value (sizes, heights, indexes) and then
//! mutates a live view goes through [`Dispatcher::two_phase`]. The compute
//! closure runs on tokio's blocking pool. Its result is posted as a job to the
//! [`MainQueue`], which the thread that owns the views drains (typically once
//! per frame via [`MainQueue::run_pending`]).

use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// A unit of work for the owning thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Completion callback, invoked exactly once on the owning thread.
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Invoke an optional completion.
pub(crate) fn complete(completion: Option<Completion>) {
    if let Some(done) = completion {
        done();
    }
}

/// Schedules compute work on the runtime and apply work on the main queue.
#[derive(Clone)]
pub struct Dispatcher {
    runtime: Handle,
    main_tx: mpsc::UnboundedSender<Job>,
}

/// Receiving end of the apply phase, owned by the UI thread.
pub struct MainQueue {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl Dispatcher {
    /// Create a dispatcher bound to `runtime`, plus the queue its apply
    /// phases are delivered to.
    pub fn new(runtime: Handle) -> (Self, MainQueue) {
        let (main_tx, rx) = mpsc::unbounded_channel();
        (Self { runtime, main_tx }, MainQueue { rx })
    }

    /// Bind to the runtime of the calling context.
    ///
    /// Panics outside a tokio runtime, like `Handle::current`.
    pub fn current() -> (Self, MainQueue) {
        Self::new(Handle::current())
    }

    /// Queue a job for the owning thread without a compute phase.
    ///
    /// A closed queue means the owner is gone; the job is dropped.
    pub fn post(&self, job: Job) {
        if self.main_tx.send(job).is_err() {
            tracing::warn!("main queue closed; dropping apply job");
        }
    }

    /// Run `compute` on the blocking pool, then `apply` on the main queue.
    ///
    /// `apply` receives `None` when the compute phase panicked so callers can
    /// still signal their completion. If the main queue is gone, `apply` runs
    /// inline with `None`; it must not touch views in that case.
    pub fn two_phase<T, C, A>(&self, compute: C, apply: A)
    where
        T: Send + 'static,
        C: FnOnce() -> T + Send + 'static,
        A: FnOnce(Option<T>) + Send + 'static,
    {
        let main_tx = self.main_tx.clone();
        self.runtime.spawn(async move {
            let value = match tokio::task::spawn_blocking(compute).await {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("compute phase failed: {}", e);
                    None
                }
            };

            let slot = Arc::new(Mutex::new(Some(apply)));
            let queued = slot.clone();
            let job: Job = Box::new(move || {
                if let Some(apply) = take(&queued) {
                    apply(value);
                }
            });
            if let Err(mpsc::error::SendError(job)) = main_tx.send(job) {
                drop(job);
                tracing::warn!("main queue closed; completing without apply");
                if let Some(apply) = take(&slot) {
                    apply(None);
                }
            }
        });
    }
}

fn take<A>(slot: &Mutex<Option<A>>) -> Option<A> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

impl MainQueue {
    /// Run every job that is ready, without waiting. Returns the number run.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Wait for the next job and run it. Returns `false` once every
    /// dispatcher has been dropped and the queue is drained.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Wait for and run `count` jobs.
    pub async fn run_jobs(&mut self, count: usize) -> usize {
        let mut ran = 0;
        while ran < count && self.run_next().await {
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_apply_runs_on_queue_with_computed_value() {
        let (dispatcher, mut queue) = Dispatcher::current();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();

        dispatcher.two_phase(
            || 21 * 2,
            move |value| {
                seen_clone.store(value.unwrap_or_default(), Ordering::SeqCst);
            },
        );

        // Nothing applies until the owner drains the queue.
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert!(queue.run_next().await);
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[tokio::test]
    async fn test_panicking_compute_still_applies() {
        let (dispatcher, mut queue) = Dispatcher::current();
        let applied = Arc::new(AtomicUsize::new(0));
        let applied_clone = applied.clone();

        dispatcher.two_phase(
            || -> usize { panic!("measurement blew up") },
            move |value| {
                assert!(value.is_none());
                applied_clone.fetch_add(1, Ordering::SeqCst);
            },
        );

        assert!(queue.run_next().await);
        assert_eq!(applied.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_pending_drains_posted_jobs() {
        let (dispatcher, mut queue) = Dispatcher::current();
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let count = count.clone();
            dispatcher.post(Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }));
        }

        assert_eq!(queue.run_pending(), 3);
        assert_eq!(queue.run_pending(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_closed_queue_applies_inline_without_value() {
        let (dispatcher, queue) = Dispatcher::current();
        drop(queue);
        let (tx, rx) = tokio::sync::oneshot::channel();

        dispatcher.two_phase(
            || 7usize,
            move |value| {
                let _ = tx.send(value);
            },
        );

        assert_eq!(rx.await.ok(), Some(None));
    }

    #[tokio::test]
    async fn test_run_next_ends_when_dispatchers_drop() {
        let (dispatcher, mut queue) = Dispatcher::current();
        drop(dispatcher);
        assert!(!queue.run_next().await);
    }
}
