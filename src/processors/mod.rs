use crate::circuit::state::ProbeOutcome;
use crate::domain::payment::PaymentRequest;
use crate::domain::processor::Processor;
use std::sync::Arc;

pub mod http;

/// Classification of one submission attempt against a processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// Upstream already accounted for this correlation id (422-class);
    /// treated as success without touching the ledger.
    AlreadyProcessed,
    /// Error status, timeout, or connection failure.
    Failed,
}

/// Capability pair each processor exposes to the router and the monitor.
/// Both methods classify rather than fail: transport errors come back as
/// `SubmitOutcome::Failed` / `ProbeOutcome::Unreachable`, never as `Err`.
#[async_trait::async_trait]
pub trait ProcessorApi: Send + Sync {
    fn name(&self) -> Processor;

    async fn submit(&self, request: &PaymentRequest) -> SubmitOutcome;

    async fn probe(&self) -> ProbeOutcome;
}

#[derive(Clone)]
pub struct ProcessorPair {
    pub default: Arc<dyn ProcessorApi>,
    pub fallback: Arc<dyn ProcessorApi>,
}

impl ProcessorPair {
    pub fn get(&self, processor: Processor) -> &Arc<dyn ProcessorApi> {
        match processor {
            Processor::Default => &self.default,
            Processor::Fallback => &self.fallback,
        }
    }
}
