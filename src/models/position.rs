//! # models::position
//!
//! Structs for **requesting** a long position and for the position records
//! the broker reports back afterwards.
//!
//! `PositionRequest`        = what the strategy asks the broker to open
//! `PositionCreationResult` = the broker's immediate answer
//! `Position`               = lifecycle record streamed on later updates

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::CurrencyPair;

// ─── PositionRules ────────────────────────────────────────────────────────────

/// Protective exits attached to every position the strategy opens.
///
/// Percentages are relative to the entry price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRules {
    pub stop_gain_percentage: f64,
    pub stop_loss_percentage: f64,
}

impl PositionRules {
    pub const fn new(stop_gain_percentage: f64, stop_loss_percentage: f64) -> Self {
        Self {
            stop_gain_percentage,
            stop_loss_percentage,
        }
    }
}

// ─── PositionRequest ──────────────────────────────────────────────────────────

/// Request to open a long position, built when the downtrend trigger fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRequest {
    /// Correlates log lines and bridge calls for a single trigger.
    pub request_id: Uuid,
    pub pair: CurrencyPair,
    /// Amount of base currency to buy.
    pub amount: Decimal,
    pub rules: PositionRules,
}

impl PositionRequest {
    pub fn new(pair: CurrencyPair, amount: Decimal, rules: PositionRules) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            pair,
            amount,
            rules,
        }
    }
}

// ─── PositionCreationResult ───────────────────────────────────────────────────

/// Outcome of a `create_long_position` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionCreationResult {
    pub successful: bool,
    #[serde(default)]
    pub position_id: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl PositionCreationResult {
    pub fn opened(position_id: u64) -> Self {
        Self {
            successful: true,
            position_id: Some(position_id),
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            successful: false,
            position_id: None,
            error_message: Some(message.into()),
        }
    }
}

// ─── Position ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Opening,
    Opened,
    Closing,
    Closed,
    OpeningFailure,
    ClosingFailure,
}

/// Position record streamed by the broker whenever a position changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub position_id: u64,
    pub pair: CurrencyPair,
    pub amount: Decimal,
    pub rules: PositionRules,
    pub status: PositionStatus,
    #[serde(default)]
    pub opened_at: Option<DateTime<Utc>>,
}
