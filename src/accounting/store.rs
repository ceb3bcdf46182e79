use crate::circuit::state::HealthSnapshot;
use crate::domain::payment::PaymentRequest;
use crate::domain::processor::Processor;
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Durable, shared ledger and time-series store. Correctness relies on the
/// atomicity of each individual operation (conditional add, append, range
/// query), never on cross-operation transactions.
#[async_trait::async_trait]
pub trait AccountingStore: Send + Sync {
    /// Conditional-add of the correlation id to the processed-ids set.
    /// Returns true iff the id was absent. This is the single linearization
    /// point that prevents double counting.
    async fn try_record(&self, correlation_id: uuid::Uuid) -> Result<bool>;

    /// Append the serialized request to the processor's payment series,
    /// scored by the request's original `requested_at`.
    async fn append_payment(&self, processor: Processor, request: &PaymentRequest) -> Result<()>;

    /// Durable parking place for requests that currently have no route.
    async fn park_backoff(&self, request: &PaymentRequest) -> Result<()>;

    /// Range query over a processor's payment series. Only-from means
    /// `[from, +inf)`; both bounds are inclusive; no bounds means the full
    /// series. The backoff series is never part of this query.
    async fn payments_in_range(
        &self,
        processor: Processor,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>>;

    /// Observability only: audit series of health snapshots per processor.
    async fn append_health(
        &self,
        processor: Processor,
        snapshot: &HealthSnapshot,
        at: DateTime<Utc>,
    ) -> Result<()>;
}
