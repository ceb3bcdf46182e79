use crate::circuit::state::ProbeOutcome;
use crate::domain::payment::PaymentRequest;
use crate::domain::processor::Processor;
use crate::processors::{ProcessorApi, SubmitOutcome};
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthBody {
    failing: bool,
    min_response_time: i64,
}

pub struct HttpProcessor {
    pub name: Processor,
    pub base_url: String,
    pub token: String,
    pub submit_timeout_ms: u64,
    pub probe_timeout_ms: u64,
    pub client: reqwest::Client,
}

/// 2xx accepted, 422 already accounted upstream, anything else failed.
fn classify_submit(status: StatusCode) -> SubmitOutcome {
    if status.is_success() {
        SubmitOutcome::Accepted
    } else if status == StatusCode::UNPROCESSABLE_ENTITY {
        SubmitOutcome::AlreadyProcessed
    } else {
        SubmitOutcome::Failed
    }
}

/// 429 means the probe itself was throttled; a 2xx without a decodable body
/// carries no usable signal and counts as unreachable.
fn classify_probe(status: StatusCode, body: &str) -> ProbeOutcome {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ProbeOutcome::Throttled;
    }
    if !status.is_success() {
        return ProbeOutcome::Unreachable;
    }
    match serde_json::from_str::<HealthBody>(body) {
        Ok(health) => ProbeOutcome::Healthy {
            failing: health.failing,
            min_response_time_ms: health.min_response_time,
        },
        Err(e) => {
            tracing::debug!("health body decode failed: {e}");
            ProbeOutcome::Unreachable
        }
    }
}

#[async_trait::async_trait]
impl ProcessorApi for HttpProcessor {
    fn name(&self) -> Processor {
        self.name
    }

    async fn submit(&self, request: &PaymentRequest) -> SubmitOutcome {
        let url = format!("{}/payments", self.base_url);
        let resp = self
            .client
            .post(url)
            .header("X-Rinha-Token", &self.token)
            .json(request)
            .timeout(std::time::Duration::from_millis(self.submit_timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) => {
                let outcome = classify_submit(r.status());
                if outcome == SubmitOutcome::Failed {
                    tracing::debug!(
                        processor = %self.name,
                        status = r.status().as_u16(),
                        "payment submission rejected"
                    );
                }
                outcome
            }
            Err(e) => {
                tracing::debug!(processor = %self.name, "payment submission error: {e}");
                SubmitOutcome::Failed
            }
        }
    }

    async fn probe(&self) -> ProbeOutcome {
        let url = format!("{}/payments/service-health", self.base_url);
        let resp = self
            .client
            .get(url)
            .header("X-Rinha-Token", &self.token)
            .timeout(std::time::Duration::from_millis(self.probe_timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) => {
                let status = r.status();
                let body = r.text().await.unwrap_or_default();
                let outcome = classify_probe(status, &body);
                if outcome == ProbeOutcome::Unreachable {
                    tracing::debug!(
                        processor = %self.name,
                        status = status.as_u16(),
                        "health probe yielded no usable signal"
                    );
                }
                outcome
            }
            Err(e) => {
                tracing::debug!(processor = %self.name, "health probe error: {e}");
                ProbeOutcome::Unreachable
            }
        }
    }
}
