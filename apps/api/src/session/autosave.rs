//! Debounced autosave: at most one pending save, replaced by every new schedule.
//!
//! Each `schedule` bumps a generation counter and aborts the previous task. The task sleeps
//! for the configured delay and only runs its save if its generation is still the latest, so
//! a task that wakes after being superseded does nothing even if the abort raced it.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

pub struct Autosave {
    /// `None` disables autosave.
    delay: Option<Duration>,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Autosave {
    /// A zero `delay` disables autosave entirely.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: (!delay.is_zero()).then_some(delay),
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.delay.is_some()
    }

    /// Replaces any pending save with `save`, to run after the delay.
    pub fn schedule<F, Fut>(&self, save: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let Some(delay) = self.delay else {
            return;
        };
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) != ticket {
                debug!(ticket, "Autosave superseded");
                return;
            }
            save().await;
        });

        if let Some(previous) = self.replace_pending(Some(task)) {
            previous.abort();
        }
    }

    /// Drops any pending save without running it.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = self.replace_pending(None) {
            previous.abort();
        }
    }

    fn replace_pending(&self, task: Option<JoinHandle<()>>) -> Option<JoinHandle<()>> {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *pending, task)
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.cancel();
    }
}
