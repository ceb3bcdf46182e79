use crate::accounting::store::AccountingStore;
use crate::circuit::state::HealthSnapshot;
use crate::circuit::store::CircuitStateStore;
use crate::circuit::transitions::{apply_transition, CircuitUpdate};
use crate::domain::processor::{Processor, PROCESSORS};
use crate::processors::ProcessorPair;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Long-lived poller that keeps the circuit state store fresh. A fault in
/// one processor's check is logged and must never terminate the loop; a loop
/// that dies stops refreshing circuits, which degrades every route to
/// `Unknown` once the TTLs lapse.
pub struct HealthMonitor {
    pub processors: ProcessorPair,
    pub circuit: Arc<dyn CircuitStateStore>,
    pub accounting: Arc<dyn AccountingStore>,
    pub interval: Duration,
}

impl HealthMonitor {
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "health monitor started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            for processor in PROCESSORS {
                if let Err(err) = self.check(processor).await {
                    tracing::error!(%processor, "health check cycle failed: {err:#}");
                }
            }
        }
        tracing::info!("health monitor stopped");
    }

    async fn check(&self, processor: Processor) -> Result<()> {
        let probe = self.processors.get(processor).probe().await;

        let previous = self.circuit.get(processor).await?;
        let default_color = match processor {
            Processor::Default => previous,
            Processor::Fallback => self.circuit.get(Processor::Default).await?,
        };

        match apply_transition(processor, &probe, previous, default_color) {
            CircuitUpdate::Store { color, ttl } => {
                self.circuit.set(processor, color, ttl).await?;
                if color != previous {
                    tracing::info!(%processor, from = previous.as_str(), to = color.as_str(), "circuit transition");
                }
            }
            CircuitUpdate::Leave => {}
        }

        // Audit trail is best effort; a persistence failure never aborts
        // the cycle.
        let snapshot = HealthSnapshot::from_probe(&probe);
        if let Err(err) = self
            .accounting
            .append_health(processor, &snapshot, chrono::Utc::now())
            .await
        {
            tracing::warn!(%processor, "health snapshot not persisted: {err:#}");
        }

        Ok(())
    }
}
