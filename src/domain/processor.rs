use serde::{Deserialize, Serialize};

/// The two upstream processing services. A closed variant rather than a
/// string key: the router and monitor are written once and parameterized
/// over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Processor {
    Default,
    Fallback,
}

pub const PROCESSORS: [Processor; 2] = [Processor::Default, Processor::Fallback];

impl Processor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Processor::Default => "default",
            Processor::Fallback => "fallback",
        }
    }

    /// Sorted set holding every successfully routed payment for this
    /// processor, scored by the request's original timestamp.
    pub fn payments_key(&self) -> &'static str {
        match self {
            Processor::Default => "payment-requests-default",
            Processor::Fallback => "payment-requests-fallback",
        }
    }

    /// Audit series of health snapshots, scored by poll time.
    pub fn health_key(&self) -> &'static str {
        match self {
            Processor::Default => "health-checks-default",
            Processor::Fallback => "health-checks-fallback",
        }
    }
}

impl std::fmt::Display for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
