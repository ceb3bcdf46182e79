use serde::{Deserialize, Serialize};

/// Per-processor traffic light. `Unknown` is what an absent or expired store
/// entry reads back as; the router treats it exactly like `Red`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircuitColor {
    Green,
    Red,
    Unknown,
}

impl CircuitColor {
    pub fn is_green(&self) -> bool {
        matches!(self, CircuitColor::Green)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitColor::Green => "green",
            CircuitColor::Red => "red",
            CircuitColor::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> CircuitColor {
        match s {
            "green" => CircuitColor::Green,
            "red" => CircuitColor::Red,
            _ => CircuitColor::Unknown,
        }
    }
}

/// Classification of a single health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Healthy {
        failing: bool,
        min_response_time_ms: i64,
    },
    /// The probe itself was rate-limited (429); no fresh data.
    Throttled,
    /// Network error, timeout, or unexpected status.
    Unreachable,
}

/// Persisted audit copy of one poll cycle's observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub failing: bool,
    pub min_response_time: i64,
    pub too_many_requests: bool,
}

impl HealthSnapshot {
    /// Best-effort reconstruction when the probe yielded no body.
    pub fn from_probe(probe: &ProbeOutcome) -> Self {
        match *probe {
            ProbeOutcome::Healthy {
                failing,
                min_response_time_ms,
            } => Self {
                failing,
                min_response_time: min_response_time_ms,
                too_many_requests: false,
            },
            ProbeOutcome::Throttled => Self {
                failing: false,
                min_response_time: 0,
                too_many_requests: true,
            },
            ProbeOutcome::Unreachable => Self {
                failing: true,
                min_response_time: 0,
                too_many_requests: false,
            },
        }
    }
}
