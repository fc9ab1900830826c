//! # state
//!
//! Shared state injected into every Axum handler.
//!
//! Handlers never touch the strategy directly: they hold the runner's
//! [`StrategyHandle`] and enqueue events, so the controller stays confined
//! to its own task.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::StrategyConfig;
use crate::engine::runner::StrategyHandle;

#[derive(Clone)]
pub struct AppState {
    /// Producer side of the strategy runner.
    pub strategy: StrategyHandle,

    /// Settings the strategy was started with (reported by `/api/health`).
    pub config: Arc<StrategyConfig>,

    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(strategy: StrategyHandle, config: StrategyConfig) -> Self {
        Self {
            strategy,
            config: Arc::new(config),
            started_at: Utc::now(),
        }
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

pub fn build_state(strategy: StrategyHandle, config: StrategyConfig) -> SharedState {
    Arc::new(AppState::new(strategy, config))
}
