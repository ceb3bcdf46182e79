use anyhow::Context;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub default_processor_url: String,
    pub fallback_processor_url: String,
    pub processor_token: String,
    pub redis_url: String,
    pub bind_addr: String,
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub health_poll_interval_ms: u64,
    pub submit_timeout_ms: u64,
    pub probe_timeout_ms: u64,
    pub max_route_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl AppConfig {
    /// Processor URLs and the token have no sane default; their absence is
    /// fatal before any traffic is served.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            default_processor_url: std::env::var("DEFAULT_PROCESSOR_URL")
                .context("DEFAULT_PROCESSOR_URL is not set")?,
            fallback_processor_url: std::env::var("FALLBACK_PROCESSOR_URL")
                .context("FALLBACK_PROCESSOR_URL is not set")?,
            processor_token: std::env::var("PROCESSOR_TOKEN")
                .context("PROCESSOR_TOKEN is not set")?,
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string()),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:9999".to_string()),
            worker_count: env_parse("WORKER_COUNT", 4),
            queue_capacity: env_parse("QUEUE_CAPACITY", 4096),
            health_poll_interval_ms: env_parse("HEALTH_POLL_INTERVAL_MS", 1000),
            submit_timeout_ms: env_parse("SUBMIT_TIMEOUT_MS", 2500),
            probe_timeout_ms: env_parse("PROBE_TIMEOUT_MS", 1500),
            max_route_attempts: env_parse("MAX_ROUTE_ATTEMPTS", 8),
            retry_base_delay_ms: env_parse("RETRY_BASE_DELAY_MS", 100),
            retry_max_delay_ms: env_parse("RETRY_MAX_DELAY_MS", 2000),
        })
    }
}

fn env_parse<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 3] = [
        "DEFAULT_PROCESSOR_URL",
        "FALLBACK_PROCESSOR_URL",
        "PROCESSOR_TOKEN",
    ];

    // Environment variables are process-global, so the whole fail-fast
    // behavior is exercised in one sequential test.
    #[test]
    fn missing_required_vars_are_fatal() {
        for name in REQUIRED {
            std::env::remove_var(name);
        }
        assert!(AppConfig::from_env().is_err());

        std::env::set_var("DEFAULT_PROCESSOR_URL", "http://localhost:8001");
        std::env::set_var("FALLBACK_PROCESSOR_URL", "http://localhost:8002");
        assert!(
            AppConfig::from_env().is_err(),
            "a missing token must still be fatal"
        );

        std::env::set_var("PROCESSOR_TOKEN", "secret");
        let cfg = AppConfig::from_env().expect("all required vars present");
        assert_eq!(cfg.default_processor_url, "http://localhost:8001");
        assert_eq!(cfg.worker_count, 4);
        assert_eq!(cfg.queue_capacity, 4096);

        for name in REQUIRED {
            std::env::remove_var(name);
        }
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("DEFAULT_PROCESSOR_URL"));
    }
}
