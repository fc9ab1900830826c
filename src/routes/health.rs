//! # routes::health

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

use crate::config::{traded_pair, POSITION_AMOUNT, POSITION_RULES};
use crate::state::SharedState;

// ─── GET /api/health ──────────────────────────────────────────────────────────

pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    let stats = state.strategy.stats();
    let uptime_secs = (Utc::now() - state.started_at).num_seconds();

    Json(json!({
        "ok":          true,
        "uptime_secs": uptime_secs,
        "broker":      state.config.broker.to_string(),
        "strategy": {
            "pair":            traded_pair(),
            "amount":          POSITION_AMOUNT,
            "rules":           POSITION_RULES,
            "window_capacity": state.config.window_capacity,
            "interval_secs":   state.config.tick_interval.num_seconds(),
        },
        "stats": stats,
    }))
}
