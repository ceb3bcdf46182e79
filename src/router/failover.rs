use crate::accounting::store::AccountingStore;
use crate::circuit::state::CircuitColor;
use crate::circuit::store::CircuitStateStore;
use crate::circuit::transitions::FRESH_TTL;
use crate::domain::payment::PaymentRequest;
use crate::domain::processor::Processor;
use crate::processors::{ProcessorPair, SubmitOutcome};
use anyhow::Result;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Success,
    /// Both circuits non-Green; the request was parked in the backoff
    /// series without any network call.
    NoRoute,
    Failed,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(2000),
        }
    }
}

pub struct PaymentRouter {
    pub processors: ProcessorPair,
    pub circuit: Arc<dyn CircuitStateStore>,
    pub accounting: Arc<dyn AccountingStore>,
    pub retry: RetryPolicy,
}

impl PaymentRouter {
    /// One routing attempt: default if Green, else fallback if Green, else
    /// park in the backoff series. Expired or absent circuit entries read as
    /// `Unknown` and are never treated as Green.
    pub async fn route(&self, request: &PaymentRequest) -> Result<RouteOutcome> {
        if self.circuit.get(Processor::Default).await?.is_green() {
            return self.submit(Processor::Default, request).await;
        }
        if self.circuit.get(Processor::Fallback).await?.is_green() {
            return self.submit(Processor::Fallback, request).await;
        }

        self.accounting.park_backoff(request).await?;
        tracing::warn!(
            correlation_id = %request.correlation_id,
            "no usable processor, request parked"
        );
        Ok(RouteOutcome::NoRoute)
    }

    async fn submit(&self, processor: Processor, request: &PaymentRequest) -> Result<RouteOutcome> {
        match self.processors.get(processor).submit(request).await {
            SubmitOutcome::Accepted => {
                // Fast positive feedback, independent of the next poll cycle.
                self.circuit
                    .set(processor, CircuitColor::Green, FRESH_TTL)
                    .await?;

                // The conditional add is the linearization point: only the
                // caller that wins it appends the series record.
                if self.accounting.try_record(request.correlation_id).await? {
                    self.accounting.append_payment(processor, request).await?;
                }
                Ok(RouteOutcome::Success)
            }
            SubmitOutcome::AlreadyProcessed => {
                // Already accounted upstream; recording it again here would
                // double count on retried deliveries.
                Ok(RouteOutcome::Success)
            }
            SubmitOutcome::Failed => {
                self.circuit
                    .set(processor, CircuitColor::Red, FRESH_TTL)
                    .await?;
                Ok(RouteOutcome::Failed)
            }
        }
    }

    /// Worker entry point: retries transient failures with capped
    /// exponential backoff plus jitter, then parks the request rather than
    /// pinning a worker in a busy loop. `NoRoute` stops early because the
    /// request is already durably parked.
    pub async fn route_until_settled(
        &self,
        request: &PaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let mut delay = self.retry.base_delay;
        for attempt in 1..=self.retry.max_attempts {
            if cancel.is_cancelled() {
                return Ok(());
            }

            match self.route(request).await? {
                RouteOutcome::Success | RouteOutcome::NoRoute => return Ok(()),
                RouteOutcome::Failed => {
                    tracing::debug!(
                        correlation_id = %request.correlation_id,
                        attempt,
                        "routing attempt failed"
                    );
                }
            }

            if attempt == self.retry.max_attempts {
                break;
            }

            let pause = jittered(delay);
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(pause) => {}
            }
            delay = std::cmp::min(delay * 2, self.retry.max_delay);
        }

        self.accounting.park_backoff(request).await?;
        tracing::warn!(
            correlation_id = %request.correlation_id,
            attempts = self.retry.max_attempts,
            "routing attempts exhausted, request parked"
        );
        Ok(())
    }
}

/// Uniform jitter in [delay/2, delay], so synchronized workers spread out.
fn jittered(delay: Duration) -> Duration {
    let millis = delay.as_millis().max(1) as u64;
    let low = (millis / 2).max(1);
    Duration::from_millis(rand::thread_rng().gen_range(low..=millis))
}
