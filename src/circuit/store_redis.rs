use crate::circuit::state::CircuitColor;
use crate::circuit::store::CircuitStateStore;
use crate::domain::processor::Processor;
use anyhow::Result;
use redis::AsyncCommands;
use std::time::Duration;

/// Circuit colors live in Redis under `circuit:{processor}` with a server-side
/// TTL, so a stalled monitor silently degrades the entry to `Unknown`.
#[derive(Clone)]
pub struct CircuitStoreRedis {
    pub client: redis::Client,
}

impl CircuitStoreRedis {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn key(processor: Processor) -> String {
        format!("circuit:{}", processor)
    }
}

#[async_trait::async_trait]
impl CircuitStateStore for CircuitStoreRedis {
    async fn get(&self, processor: Processor) -> Result<CircuitColor> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(Self::key(processor)).await?;
        Ok(value
            .map(|v| CircuitColor::parse(&v))
            .unwrap_or(CircuitColor::Unknown))
    }

    async fn set(&self, processor: Processor, color: CircuitColor, ttl: Duration) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn
            .set_ex(
                Self::key(processor),
                color.as_str(),
                ttl.as_secs().max(1),
            )
            .await?;
        Ok(())
    }
}
