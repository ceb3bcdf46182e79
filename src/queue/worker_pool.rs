use crate::queue::work_queue::WorkSource;
use crate::router::failover::PaymentRouter;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Fixed set of loops draining the shared queue. One bad task must never
/// disable a worker: every execution runs inside its own failure boundary,
/// and errors are logged and discarded.
pub fn spawn_workers(
    count: usize,
    source: WorkSource,
    router: Arc<PaymentRouter>,
    cancel: CancellationToken,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|id| {
            let source = source.clone();
            let router = router.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                worker_loop(id, source, router, cancel).await;
            })
        })
        .collect()
}

async fn worker_loop(
    id: usize,
    source: WorkSource,
    router: Arc<PaymentRouter>,
    cancel: CancellationToken,
) {
    tracing::info!(worker = id, "payment worker started");
    loop {
        let Some(request) = source.dequeue(&cancel).await else {
            break;
        };

        let correlation_id = request.correlation_id;
        if let Err(err) = router.route_until_settled(&request, &cancel).await {
            tracing::error!(
                worker = id,
                %correlation_id,
                "payment task failed: {err:#}"
            );
        }
    }
    tracing::info!(worker = id, "payment worker stopped");
}
