use std::sync::Arc;

use tokio::sync::watch;

/// Snapshot of the navigation progress bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub active: bool,
    pub started: u64,
    pub completed: u64,
}

/// Navigation progress bar. Starting while already active only bumps the
/// counter, the same way a real progress bar just keeps animating.
#[derive(Clone, Debug)]
pub struct ProgressIndicator {
    tx: Arc<watch::Sender<ProgressState>>,
}

impl ProgressIndicator {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ProgressState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn start(&self) {
        self.tx.send_modify(|s| {
            s.active = true;
            s.started += 1;
        });
    }

    pub fn done(&self) {
        self.tx.send_modify(|s| {
            s.active = false;
            s.completed += 1;
        });
    }

    /// Start now, finish when the returned guard drops.
    pub fn begin(&self) -> ProgressGuard<'_> {
        self.start();
        ProgressGuard { progress: self }
    }

    pub fn state(&self) -> ProgressState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.tx.subscribe()
    }
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ProgressGuard<'a> {
    progress: &'a ProgressIndicator,
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.progress.done();
    }
}
