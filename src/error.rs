//! # error
//!
//! Centralised application error type.
//!
//! HTTP handlers return `Result<_, AppError>`; the `IntoResponse` impl turns
//! it into a JSON body so feed adapters always get a machine-readable answer.
//! Inside the strategy core nothing is escalated: broker failures are mapped
//! into results and logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The request body could not be decoded into an event.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The strategy runner has stopped and no longer accepts events.
    #[error("Event queue closed")]
    QueueClosed,

    /// The broker collaborator failed (transport, HTTP status or payload).
    #[error("Broker error: {0}")]
    Broker(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::QueueClosed => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Broker(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "ok":    false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
