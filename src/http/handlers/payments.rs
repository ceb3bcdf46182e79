use crate::domain::payment::{err, CreatePaymentRequest, PaymentRequest};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;

/// Accepts the payment and acknowledges immediately; routing happens
/// asynchronously and processor failures never surface here. Enqueueing
/// suspends once the queue is full, which is the backpressure the caller
/// observes.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    if req.amount <= Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(err("INVALID_AMOUNT", "amount must be positive")),
        )
            .into_response();
    }

    let request = PaymentRequest {
        correlation_id: req.correlation_id,
        amount: req.amount,
        requested_at: chrono::Utc::now(),
    };

    if let Err(e) = state.queue.enqueue(request).await {
        tracing::error!("enqueue failed: {e:#}");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(err("QUEUE_CLOSED", "service is shutting down")),
        )
            .into_response();
    }

    StatusCode::CREATED.into_response()
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
