use crate::domain::payment::PaymentRequest;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// Bounded queue of deferred payment submissions. `enqueue` suspends the
/// producer once the queue is at capacity; work is never dropped and the
/// queue never grows past its bound. This is the only admission-control
/// mechanism in the process.
#[derive(Clone)]
pub struct WorkQueue {
    tx: mpsc::Sender<PaymentRequest>,
}

/// Receiving half shared by the worker pool. The mutex makes the single
/// receiver multi-consumer; a worker holds it only across one `recv`.
#[derive(Clone)]
pub struct WorkSource {
    rx: Arc<Mutex<mpsc::Receiver<PaymentRequest>>>,
}

pub fn work_queue(capacity: usize) -> (WorkQueue, WorkSource) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        WorkQueue { tx },
        WorkSource {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

impl WorkQueue {
    pub async fn enqueue(&self, request: PaymentRequest) -> Result<()> {
        self.tx
            .send(request)
            .await
            .map_err(|_| anyhow!("work queue is closed"))
    }
}

impl WorkSource {
    /// Blocks until an item is available, the queue closes, or the
    /// process-wide cancellation fires.
    pub async fn dequeue(&self, cancel: &CancellationToken) -> Option<PaymentRequest> {
        let mut rx = self.rx.lock().await;
        tokio::select! {
            _ = cancel.cancelled() => None,
            item = rx.recv() => item,
        }
    }
}
