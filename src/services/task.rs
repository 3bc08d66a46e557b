//! Background task runner service
//!
//! Network and image work never runs on the main sequence. Each
//! operation is spawned onto its own thread and sends a single result
//! back over a channel; the app polls the channel on every tick.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

/// A single in-flight background task
struct BackgroundTask<T> {
    receiver: Receiver<T>,
    start_instant: Instant,
}

/// One-slot runner for a kind of background operation
///
/// Holds at most one task; `is_busy` gates re-entry while a task is in
/// flight. Clearing (or dropping) the runner abandons the worker: its
/// send lands in a closed channel and the result is discarded, so a
/// screen dismissed mid-request never sees a late callback.
pub struct TaskRunner<T> {
    task: Option<BackgroundTask<T>>,
}

impl<T: Send + 'static> Default for TaskRunner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> TaskRunner<T> {
    pub fn new() -> Self {
        Self { task: None }
    }

    /// Whether a task is currently in flight
    pub fn is_busy(&self) -> bool {
        self.task.is_some()
    }

    /// Elapsed time of the current task, for spinner text
    pub fn elapsed(&self) -> Option<Duration> {
        self.task.as_ref().map(|t| t.start_instant.elapsed())
    }

    /// Spawn a worker; its return value is delivered through `poll`
    ///
    /// A task already in flight stays in place and the new work is not
    /// started; callers check `is_busy` first.
    pub fn spawn<F>(&mut self, work: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        if self.task.is_some() {
            return;
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // Receiver may be gone if the screen was dismissed
            let _ = tx.send(work());
        });

        self.task = Some(BackgroundTask {
            receiver: rx,
            start_instant: Instant::now(),
        });
    }

    /// Poll for the task result; frees the slot once it arrives
    pub fn poll(&mut self) -> Option<T> {
        let task = self.task.as_ref()?;

        match task.receiver.try_recv() {
            Ok(value) => {
                self.task = None;
                Some(value)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                // Worker died without sending; free the slot
                self.task = None;
                None
            }
        }
    }

    /// Abandon the current task, discarding its eventual result
    pub fn clear(&mut self) {
        self.task = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Poll with a bounded wait so a missed send fails the test instead
    /// of hanging it
    fn poll_until<T: Send + 'static>(runner: &mut TaskRunner<T>) -> Option<T> {
        for _ in 0..200 {
            if let Some(value) = runner.poll() {
                return Some(value);
            }
            thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_spawn_and_poll() {
        let mut runner = TaskRunner::new();
        assert!(!runner.is_busy());

        runner.spawn(|| 40 + 2);
        assert!(runner.is_busy());

        assert_eq!(poll_until(&mut runner), Some(42));
        assert!(!runner.is_busy());
        assert!(runner.poll().is_none());
    }

    #[test]
    fn test_spawn_while_busy_is_ignored() {
        let mut runner = TaskRunner::new();
        runner.spawn(|| {
            thread::sleep(Duration::from_millis(50));
            1
        });
        runner.spawn(|| 2);

        assert_eq!(poll_until(&mut runner), Some(1));
        assert!(runner.poll().is_none());
    }

    #[test]
    fn test_clear_abandons_result() {
        let mut runner = TaskRunner::new();
        runner.spawn(|| {
            thread::sleep(Duration::from_millis(20));
            7
        });
        runner.clear();
        assert!(!runner.is_busy());

        // The worker's send goes into a closed channel; nothing arrives
        thread::sleep(Duration::from_millis(60));
        assert!(runner.poll().is_none());
    }

    #[test]
    fn test_elapsed_only_while_busy() {
        let mut runner: TaskRunner<u8> = TaskRunner::new();
        assert!(runner.elapsed().is_none());

        runner.spawn(|| 0);
        assert!(runner.elapsed().is_some());

        poll_until(&mut runner);
        assert!(runner.elapsed().is_none());
    }
}
