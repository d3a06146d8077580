use crossbeam::channel::Sender;
use log::{debug, info};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Snapshot of how far a rename run has come
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub processed: usize,
    pub total: usize,
    /// 0-100, 0 when there is nothing to process
    pub percent: f64,
    pub elapsed: Duration,
}

/// State shared between a rename worker and whoever drives it.
///
/// Holds the pause gate, the progress counters and the start time. Wrap it
/// in an `Arc` to share it with a worker thread.
pub struct RunContext {
    paused: Mutex<bool>,
    resumed: Condvar,
    processed: AtomicUsize,
    total: AtomicUsize,
    start_time: Mutex<Instant>,
    progress_tx: Option<Sender<ProgressUpdate>>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            paused: Mutex::new(false),
            resumed: Condvar::new(),
            processed: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            start_time: Mutex::new(Instant::now()),
            progress_tx: None,
        }
    }

    /// Publish a [`ProgressUpdate`] on `tx` after every leaf folder
    pub fn with_progress_channel(mut self, tx: Sender<ProgressUpdate>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    // A poisoned lock only means another thread panicked mid-update of plain data
    fn lock_paused(&self) -> MutexGuard<'_, bool> {
        self.paused.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn pause(&self) {
        *self.lock_paused() = true;
        info!("Paused");
    }

    pub fn resume(&self) {
        *self.lock_paused() = false;
        self.resumed.notify_all();
        info!("Resumed");
    }

    /// Flip the pause state, returning true if now paused
    pub fn toggle_pause(&self) -> bool {
        let mut paused = self.lock_paused();
        *paused = !*paused;
        if !*paused {
            self.resumed.notify_all();
        }
        info!("{}", if *paused { "Paused" } else { "Resumed" });
        *paused
    }

    pub fn is_paused(&self) -> bool {
        *self.lock_paused()
    }

    /// Block the calling thread until the context is not paused
    pub fn wait_while_paused(&self) {
        let paused = self.lock_paused();
        if *paused {
            debug!("Worker waiting for resume");
        }
        let _guard = self
            .resumed
            .wait_while(paused, |paused| *paused)
            .unwrap_or_else(|e| e.into_inner());
    }

    /// Reset counters and clock for a run over `total` leaf folders
    pub fn start(&self, total: usize) {
        self.processed.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
        *self.start_time.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
        self.publish();
    }

    /// Count one finished leaf folder and publish the new progress
    pub fn leaf_done(&self) -> ProgressUpdate {
        self.processed.fetch_add(1, Ordering::SeqCst);
        self.publish()
    }

    pub fn progress(&self) -> ProgressUpdate {
        let processed = self.processed.load(Ordering::SeqCst);
        let total = self.total.load(Ordering::SeqCst);
        let percent = if total > 0 {
            (processed as f64 / total as f64 * 100.0).min(100.0)
        } else {
            0.0
        };
        let elapsed = self
            .start_time
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .elapsed();

        ProgressUpdate {
            processed,
            total,
            percent,
            elapsed,
        }
    }

    fn publish(&self) -> ProgressUpdate {
        let update = self.progress();
        if let Some(tx) = &self.progress_tx {
            // The receiver going away must not stop the work
            let _ = tx.send(update);
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_progress_percent() {
        let ctx = RunContext::new();
        assert_eq!(ctx.progress().percent, 0.0);

        ctx.start(4);
        ctx.leaf_done();
        assert_eq!(ctx.progress().processed, 1);
        assert_eq!(ctx.progress().percent, 25.0);

        for _ in 0..3 {
            ctx.leaf_done();
        }
        assert_eq!(ctx.progress().percent, 100.0);
    }

    #[test]
    fn test_zero_total_reports_zero_percent() {
        let ctx = RunContext::new();
        ctx.start(0);
        assert_eq!(ctx.progress().percent, 0.0);
    }

    #[test]
    fn test_updates_are_published() {
        let (tx, rx) = unbounded();
        let ctx = RunContext::new().with_progress_channel(tx);

        ctx.start(2);
        ctx.leaf_done();
        ctx.leaf_done();
        drop(ctx);

        let processed: Vec<usize> = rx.iter().map(|u| u.processed).collect();
        assert_eq!(processed, vec![0, 1, 2]);
    }

    #[test]
    fn test_toggle_pause() {
        let ctx = RunContext::new();
        assert!(!ctx.is_paused());
        assert!(ctx.toggle_pause());
        assert!(ctx.is_paused());
        assert!(!ctx.toggle_pause());
        assert!(!ctx.is_paused());
    }

    #[test]
    fn test_wait_while_paused_blocks_until_resume() {
        let ctx = Arc::new(RunContext::new());
        ctx.pause();

        let passed = Arc::new(AtomicBool::new(false));
        let handle = {
            let ctx = Arc::clone(&ctx);
            let passed = Arc::clone(&passed);
            thread::spawn(move || {
                ctx.wait_while_paused();
                passed.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(100));
        assert!(!passed.load(Ordering::SeqCst));

        ctx.resume();
        handle.join().unwrap();
        assert!(passed.load(Ordering::SeqCst));
    }
}
