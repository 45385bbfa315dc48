//! Cancellable timers on the tokio runtime.

use std::future::Future;

use tokio::task::JoinHandle;

/// Pending timer or background task owned by a view.
///
/// Dropping the handle aborts the task, so a torn-down view never receives
/// a late state update from a timer it started.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Spawn `future` on the current Tokio runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(future),
        }
    }

    /// Abort now.
    pub fn cancel(self) {
        drop(self);
    }

    /// Whether the task ran to completion or was aborted.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
        time::Duration,
    };

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_the_timer() {
        let fired = Arc::new(AtomicBool::new(false));
        let handle = {
            let fired = fired.clone();
            TimerHandle::spawn(async move {
                tokio::time::sleep(Duration::from_millis(300)).await;
                fired.store(true, Ordering::SeqCst);
            })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(!fired.load(Ordering::SeqCst));
    }
}
