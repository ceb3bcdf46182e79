use crate::circuit::state::{CircuitColor, ProbeOutcome};
use crate::domain::processor::Processor;
use std::time::Duration;

/// Latency ceiling above which the default processor is considered unusable.
pub const DEFAULT_LATENCY_CEILING_MS: i64 = 2000;
/// Stricter ceiling for the fallback; it only applies while default is Red.
pub const FALLBACK_LATENCY_CEILING_MS: i64 = 500;
/// TTL for a color derived from a fresh probe.
pub const FRESH_TTL: Duration = Duration::from_secs(5);
/// Longer TTL used when re-storing the previous color after a throttled or
/// failed probe, so the state survives until the next useful observation.
pub const PRESERVE_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitUpdate {
    Store { color: CircuitColor, ttl: Duration },
    /// Nothing to write: the previous state was already `Unknown`.
    Leave,
}

/// Pure transition rule for one poll cycle of one processor.
///
/// `default_color` is the default processor's current color; for the default
/// processor itself it is ignored. The fallback is biased toward preferring
/// default: it is never marked Red while default is Green, regardless of its
/// own latency.
pub fn apply_transition(
    processor: Processor,
    probe: &ProbeOutcome,
    previous: CircuitColor,
    default_color: CircuitColor,
) -> CircuitUpdate {
    match *probe {
        ProbeOutcome::Healthy {
            failing,
            min_response_time_ms,
        } => {
            let color = match processor {
                Processor::Default => {
                    if !failing && min_response_time_ms < DEFAULT_LATENCY_CEILING_MS {
                        CircuitColor::Green
                    } else {
                        CircuitColor::Red
                    }
                }
                Processor::Fallback => {
                    let degraded = failing || min_response_time_ms >= FALLBACK_LATENCY_CEILING_MS;
                    if default_color == CircuitColor::Red && degraded {
                        CircuitColor::Red
                    } else {
                        CircuitColor::Green
                    }
                }
            };
            CircuitUpdate::Store {
                color,
                ttl: FRESH_TTL,
            }
        }
        // No fresh data: renew whatever we last knew instead of flapping.
        ProbeOutcome::Throttled | ProbeOutcome::Unreachable => match previous {
            CircuitColor::Unknown => CircuitUpdate::Leave,
            color => CircuitUpdate::Store {
                color,
                ttl: PRESERVE_TTL,
            },
        },
    }
}
