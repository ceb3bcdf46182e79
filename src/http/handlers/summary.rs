use crate::accounting::summary::{build_summary, InvalidRange};
use crate::domain::payment::err;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub async fn payments_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    match build_summary(state.accounting.as_ref(), query.from, query.to).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) if e.downcast_ref::<InvalidRange>().is_some() => (
            StatusCode::BAD_REQUEST,
            Json(err("INVALID_RANGE", "'from' must not be after 'to'")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("summary query failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(err("INTERNAL_ERROR", "summary query failed")),
            )
                .into_response()
        }
    }
}
