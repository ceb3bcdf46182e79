use axum::routing::{get, post};
use axum::Router;
use payment_relay::accounting::store_redis::AccountingStoreRedis;
use payment_relay::circuit::store_redis::CircuitStoreRedis;
use payment_relay::config::AppConfig;
use payment_relay::domain::processor::Processor;
use payment_relay::monitor::health::HealthMonitor;
use payment_relay::processors::http::HttpProcessor;
use payment_relay::processors::ProcessorPair;
use payment_relay::queue::work_queue::work_queue;
use payment_relay::queue::worker_pool::spawn_workers;
use payment_relay::router::failover::{PaymentRouter, RetryPolicy};
use payment_relay::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;
    let http_client = reqwest::Client::new();

    let processors = ProcessorPair {
        default: Arc::new(HttpProcessor {
            name: Processor::Default,
            base_url: cfg.default_processor_url.clone(),
            token: cfg.processor_token.clone(),
            submit_timeout_ms: cfg.submit_timeout_ms,
            probe_timeout_ms: cfg.probe_timeout_ms,
            client: http_client.clone(),
        }),
        fallback: Arc::new(HttpProcessor {
            name: Processor::Fallback,
            base_url: cfg.fallback_processor_url.clone(),
            token: cfg.processor_token.clone(),
            submit_timeout_ms: cfg.submit_timeout_ms,
            probe_timeout_ms: cfg.probe_timeout_ms,
            client: http_client,
        }),
    };

    let circuit = Arc::new(CircuitStoreRedis::new(redis_client.clone()));
    let accounting = Arc::new(AccountingStoreRedis::new(redis_client));

    let router = Arc::new(PaymentRouter {
        processors: processors.clone(),
        circuit: circuit.clone(),
        accounting: accounting.clone(),
        retry: RetryPolicy {
            max_attempts: cfg.max_route_attempts,
            base_delay: Duration::from_millis(cfg.retry_base_delay_ms),
            max_delay: Duration::from_millis(cfg.retry_max_delay_ms),
        },
    });

    let cancel = CancellationToken::new();

    let monitor = HealthMonitor {
        processors,
        circuit,
        accounting: accounting.clone(),
        interval: Duration::from_millis(cfg.health_poll_interval_ms),
    };
    tokio::spawn(monitor.run(cancel.clone()));

    let (queue, source) = work_queue(cfg.queue_capacity);
    let workers = spawn_workers(cfg.worker_count, source, router, cancel.clone());

    let state = AppState { queue, accounting };

    let app = Router::new()
        .route("/health", get(payment_relay::http::handlers::payments::health))
        .route(
            "/payments",
            post(payment_relay::http::handlers::payments::create_payment),
        )
        .route(
            "/payments-summary",
            get(payment_relay::http::handlers::summary::payments_summary),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
            shutdown.cancel();
        })
        .await?;

    cancel.cancel();
    for worker in workers {
        let _ = worker.await;
    }
    Ok(())
}
