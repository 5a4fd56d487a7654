// src/mirror/queue.rs
// =============================================================================
// The shared work queue.
//
// How it works:
// 1. The seed task is pushed and counted as pending
// 2. Workers take tasks with next(); several workers share one receiver
// 3. Every task a worker derives is counted *before* the worker reports its
//    own task complete, so the pending count can't touch zero early
// 4. When the last pending task completes, the queue is "drained" and every
//    waiting worker's next() returns None
//
// The channel is bounded. Workers offer derived tasks without blocking; if
// the queue is full the task comes back and the worker keeps it in its own
// backlog. That way a full queue slows producers down, and the pool can
// never deadlock with every worker stuck pushing into a full queue.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// One URL to process: where it was found and how to treat it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: String,
    /// Link hops from the seed (the seed is 0)
    pub depth: usize,
    /// Scan the response for further links
    pub is_page: bool,
}

impl DownloadTask {
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
            is_page: true,
        }
    }
}

pub(crate) struct WorkQueue {
    tx: mpsc::Sender<DownloadTask>,
    rx: Mutex<mpsc::Receiver<DownloadTask>>,
    /// Tasks queued, sitting in a worker backlog, or being processed
    pending: AtomicUsize,
    drained: CancellationToken,
}

impl WorkQueue {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Mutex::new(rx),
            pending: AtomicUsize::new(0),
            drained: CancellationToken::new(),
        }
    }

    /// Queues a task, waiting for room if the queue is full
    pub async fn push(&self, task: DownloadTask) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        // We own the receiver, so the channel can't be closed under us
        if self.tx.send(task).await.is_err() {
            self.complete();
        }
    }

    /// Counts `task` as pending and tries to queue it without waiting.
    /// Gives the task back when the queue is full; it stays pending and the
    /// caller is responsible for processing it.
    pub fn offer(&self, task: DownloadTask) -> Result<(), DownloadTask> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        match self.tx.try_send(task) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(task)) | Err(TrySendError::Closed(task)) => Err(task),
        }
    }

    /// Waits for the next task. None once the queue is drained or `cancel`
    /// fires.
    pub async fn next(&self, cancel: &CancellationToken) -> Option<DownloadTask> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            _ = self.drained.cancelled() => None,
            task = async { self.rx.lock().await.recv().await } => task,
        }
    }

    /// Marks one pending task as finished
    pub fn complete(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.drained.cancel();
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_drained(&self) -> bool {
        self.drained.is_cancelled()
    }
}
