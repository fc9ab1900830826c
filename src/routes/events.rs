//! # routes::events
//!
//! Event ingress — feed and broker adapters POST every update here.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::{error::AppError, events::StrategyEvent, state::SharedState};

// ─── POST /api/events ─────────────────────────────────────────────────────────

/// Enqueue one event for the strategy runner.
///
/// Answers `202 Accepted` once queued; the outcome is only visible in logs
/// and `/api/health` counters.
pub async fn post_event(
    State(state): State<SharedState>,
    payload: Result<Json<StrategyEvent>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(event) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Undecodable event rejected");
        AppError::BadRequest(rejection.body_text())
    })?;
    let kind = event.kind();
    state.strategy.submit(event).await?;

    debug!(kind, "Event queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "ok":    true,
            "event": kind,
        })),
    ))
}
