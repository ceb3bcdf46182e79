use crate::accounting::store::AccountingStore;
use crate::circuit::state::HealthSnapshot;
use crate::domain::payment::PaymentRequest;
use crate::domain::processor::Processor;
use anyhow::Result;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;

const LEDGER_KEY: &str = "processed-ids";
const BACKOFF_KEY: &str = "payment-requests-backoff";
const PEAK_LATENCY_KEY: &str = "processor-peak-latency";

#[derive(Clone)]
pub struct AccountingStoreRedis {
    pub client: redis::Client,
}

impl AccountingStoreRedis {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AccountingStore for AccountingStoreRedis {
    async fn try_record(&self, correlation_id: uuid::Uuid) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let added: i64 = conn.sadd(LEDGER_KEY, correlation_id.to_string()).await?;
        Ok(added == 1)
    }

    async fn append_payment(&self, processor: Processor, request: &PaymentRequest) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(request)?;
        let _: i64 = conn
            .zadd(processor.payments_key(), payload, request.score())
            .await?;
        Ok(())
    }

    async fn park_backoff(&self, request: &PaymentRequest) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(request)?;
        let _: i64 = conn.zadd(BACKOFF_KEY, payload, request.score()).await?;
        Ok(())
    }

    async fn payments_in_range(
        &self,
        processor: Processor,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let min = from
            .map(|t| t.timestamp().to_string())
            .unwrap_or_else(|| "-inf".to_string());
        let max = to
            .map(|t| t.timestamp().to_string())
            .unwrap_or_else(|| "+inf".to_string());
        let members: Vec<String> = conn
            .zrangebyscore(processor.payments_key(), min, max)
            .await?;
        Ok(members)
    }

    async fn append_health(
        &self,
        processor: Processor,
        snapshot: &HealthSnapshot,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(snapshot)?;
        let _: i64 = conn
            .zadd(processor.health_key(), payload, at.timestamp())
            .await?;

        // Rolling max of observed minResponseTime, never read by the router.
        if snapshot.min_response_time > 0 {
            let _: () = redis::cmd("ZADD")
                .arg(PEAK_LATENCY_KEY)
                .arg("GT")
                .arg(snapshot.min_response_time)
                .arg(processor.as_str())
                .query_async(&mut conn)
                .await?;
        }
        Ok(())
    }
}
