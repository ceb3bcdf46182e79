#![allow(dead_code)]

use anyhow::{bail, Result};
use chrono::{DateTime, TimeZone, Utc};
use payment_relay::accounting::store::AccountingStore;
use payment_relay::circuit::state::{CircuitColor, HealthSnapshot, ProbeOutcome};
use payment_relay::circuit::store::CircuitStateStore;
use payment_relay::domain::payment::PaymentRequest;
use payment_relay::domain::processor::Processor;
use payment_relay::processors::{ProcessorApi, SubmitOutcome};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub fn payment(amount: &str, ts: i64) -> PaymentRequest {
    PaymentRequest {
        correlation_id: Uuid::new_v4(),
        amount: amount.parse::<Decimal>().unwrap(),
        requested_at: Utc.timestamp_opt(ts, 0).single().unwrap(),
    }
}

pub fn at(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).single().unwrap()
}

/// TTL-respecting in-memory circuit store.
#[derive(Default)]
pub struct MemoryCircuitStore {
    entries: Mutex<HashMap<Processor, (CircuitColor, Instant)>>,
}

impl MemoryCircuitStore {
    pub fn with(colors: &[(Processor, CircuitColor)]) -> Self {
        let store = Self::default();
        {
            let mut entries = store.entries.lock().unwrap();
            for &(processor, color) in colors {
                entries.insert(processor, (color, Instant::now() + Duration::from_secs(60)));
            }
        }
        store
    }

    pub fn color(&self, processor: Processor) -> CircuitColor {
        let entries = self.entries.lock().unwrap();
        match entries.get(&processor) {
            Some(&(color, expiry)) if expiry > Instant::now() => color,
            _ => CircuitColor::Unknown,
        }
    }
}

#[async_trait::async_trait]
impl CircuitStateStore for MemoryCircuitStore {
    async fn get(&self, processor: Processor) -> Result<CircuitColor> {
        Ok(self.color(processor))
    }

    async fn set(&self, processor: Processor, color: CircuitColor, ttl: Duration) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(processor, (color, Instant::now() + ttl));
        Ok(())
    }
}

/// Always reports Green and swallows writes; pins the router onto one
/// processor so retry exhaustion can be exercised.
pub struct PinnedGreenCircuit;

#[async_trait::async_trait]
impl CircuitStateStore for PinnedGreenCircuit {
    async fn get(&self, _processor: Processor) -> Result<CircuitColor> {
        Ok(CircuitColor::Green)
    }

    async fn set(&self, _processor: Processor, _color: CircuitColor, _ttl: Duration) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct AccountingInner {
    ledger: HashSet<Uuid>,
    payments: HashMap<Processor, Vec<(i64, String)>>,
    backoff: Vec<(i64, String)>,
    health: HashMap<Processor, Vec<(i64, String)>>,
}

#[derive(Default)]
pub struct MemoryAccountingStore {
    inner: Mutex<AccountingInner>,
    pub fail_parks: AtomicBool,
    pub fail_health: AtomicBool,
}

impl MemoryAccountingStore {
    pub fn ledger_len(&self) -> usize {
        self.inner.lock().unwrap().ledger.len()
    }

    pub fn ledger_contains(&self, id: Uuid) -> bool {
        self.inner.lock().unwrap().ledger.contains(&id)
    }

    pub fn preload_ledger(&self, id: Uuid) {
        self.inner.lock().unwrap().ledger.insert(id);
    }

    pub fn payments_len(&self, processor: Processor) -> usize {
        self.inner
            .lock()
            .unwrap()
            .payments
            .get(&processor)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn backoff_len(&self) -> usize {
        self.inner.lock().unwrap().backoff.len()
    }

    pub fn health_len(&self, processor: Processor) -> usize {
        self.inner
            .lock()
            .unwrap()
            .health
            .get(&processor)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl AccountingStore for MemoryAccountingStore {
    async fn try_record(&self, correlation_id: Uuid) -> Result<bool> {
        Ok(self.inner.lock().unwrap().ledger.insert(correlation_id))
    }

    async fn append_payment(&self, processor: Processor, request: &PaymentRequest) -> Result<()> {
        let payload = serde_json::to_string(request)?;
        self.inner
            .lock()
            .unwrap()
            .payments
            .entry(processor)
            .or_default()
            .push((request.score(), payload));
        Ok(())
    }

    async fn park_backoff(&self, request: &PaymentRequest) -> Result<()> {
        if self.fail_parks.load(Ordering::SeqCst) {
            bail!("backoff series unavailable");
        }
        let payload = serde_json::to_string(request)?;
        self.inner
            .lock()
            .unwrap()
            .backoff
            .push((request.score(), payload));
        Ok(())
    }

    async fn payments_in_range(
        &self,
        processor: Processor,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>> {
        let min = from.map(|t| t.timestamp()).unwrap_or(i64::MIN);
        let max = to.map(|t| t.timestamp()).unwrap_or(i64::MAX);
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<(i64, String)> = inner
            .payments
            .get(&processor)
            .map(|v| {
                v.iter()
                    .filter(|(score, _)| *score >= min && *score <= max)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        records.sort_by_key(|(score, _)| *score);
        Ok(records.into_iter().map(|(_, payload)| payload).collect())
    }

    async fn append_health(
        &self,
        processor: Processor,
        snapshot: &HealthSnapshot,
        at: DateTime<Utc>,
    ) -> Result<()> {
        if self.fail_health.load(Ordering::SeqCst) {
            bail!("health series unavailable");
        }
        let payload = serde_json::to_string(snapshot)?;
        self.inner
            .lock()
            .unwrap()
            .health
            .entry(processor)
            .or_default()
            .push((at.timestamp(), payload));
        Ok(())
    }
}

/// Processor double fed a script of outcomes; falls back to the given
/// default once the script runs out. Counts every call.
pub struct ScriptedProcessor {
    name: Processor,
    submits: Mutex<VecDeque<SubmitOutcome>>,
    default_submit: SubmitOutcome,
    probes: Mutex<VecDeque<ProbeOutcome>>,
    default_probe: ProbeOutcome,
    pub submit_calls: AtomicUsize,
    pub probe_calls: AtomicUsize,
}

impl ScriptedProcessor {
    pub fn new(name: Processor, default_submit: SubmitOutcome) -> Self {
        Self {
            name,
            submits: Mutex::new(VecDeque::new()),
            default_submit,
            probes: Mutex::new(VecDeque::new()),
            default_probe: ProbeOutcome::Unreachable,
            submit_calls: AtomicUsize::new(0),
            probe_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_probe(name: Processor, default_probe: ProbeOutcome) -> Self {
        let mut p = Self::new(name, SubmitOutcome::Failed);
        p.default_probe = default_probe;
        p
    }

    pub fn script_submit(&self, outcome: SubmitOutcome) {
        self.submits.lock().unwrap().push_back(outcome);
    }

    pub fn script_probe(&self, outcome: ProbeOutcome) {
        self.probes.lock().unwrap().push_back(outcome);
    }

    pub fn submits(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ProcessorApi for ScriptedProcessor {
    fn name(&self) -> Processor {
        self.name
    }

    async fn submit(&self, _request: &PaymentRequest) -> SubmitOutcome {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submits
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default_submit)
    }

    async fn probe(&self) -> ProbeOutcome {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.probes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default_probe)
    }
}
