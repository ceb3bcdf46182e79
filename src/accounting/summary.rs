use crate::accounting::store::AccountingStore;
use crate::domain::payment::PaymentRequest;
use crate::domain::processor::Processor;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Client-input error: both bounds present with `from > to`. The ingress
/// maps this (and only this) summary failure to a 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRange;

impl std::fmt::Display for InvalidRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("'from' must not be after 'to'")
    }
}

impl std::error::Error for InvalidRange {}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorSummary {
    pub total_requests: u64,
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub default: ProcessorSummary,
    pub fallback: ProcessorSummary,
}

pub fn validate_range(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<(), InvalidRange> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(InvalidRange);
        }
    }
    Ok(())
}

/// Count and exact amount sum over serialized payment records. Records that
/// fail to decode are skipped rather than poisoning the whole summary.
pub fn summarize(records: &[String]) -> ProcessorSummary {
    let mut total_requests = 0u64;
    let mut total_amount = Decimal::ZERO;
    for raw in records {
        match serde_json::from_str::<PaymentRequest>(raw) {
            Ok(req) => {
                total_requests += 1;
                total_amount += req.amount;
            }
            Err(e) => {
                tracing::warn!("undecodable payment record skipped: {e}");
            }
        }
    }
    ProcessorSummary {
        total_requests,
        total_amount,
    }
}

/// Range-validated summary across both processor series. The backoff series
/// is never included.
pub async fn build_summary(
    store: &dyn AccountingStore,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<SummaryResponse> {
    validate_range(from, to)?;
    let default_records = store
        .payments_in_range(Processor::Default, from, to)
        .await?;
    let fallback_records = store
        .payments_in_range(Processor::Fallback, from, to)
        .await?;
    Ok(SummaryResponse {
        default: summarize(&default_records),
        fallback: summarize(&fallback_records),
    })
}
