use crate::circuit::state::CircuitColor;
use crate::domain::processor::Processor;
use anyhow::Result;
use std::time::Duration;

/// TTL-based mapping from processor to health color. Written only by the
/// health monitor (plus the router's fast feedback after a submission);
/// concurrent writers may race and last-write-wins is accepted, because the
/// color is an advisory routing hint, not a safety invariant.
#[async_trait::async_trait]
pub trait CircuitStateStore: Send + Sync {
    /// `Unknown` when no entry exists or the TTL has elapsed.
    async fn get(&self, processor: Processor) -> Result<CircuitColor>;

    async fn set(&self, processor: Processor, color: CircuitColor, ttl: Duration) -> Result<()>;
}
