//! # engine::controller
//!
//! **Strategy Controller** — the hot path run for every event.
//!
//! ```text
//! TickerUpdate ──▶ window.accept ──▶ full? ──▶ strictly decreasing? ──▶ can_buy? ──▶ create_long_position
//!                     │ rejected        │ no          │ no                  │ no            │ unsuccessful
//!                     ▼                 ▼             ▼                     ▼               ▼
//!                  Rejected          Waiting       NoTrend             RiskBlocked     Failed (logged)
//! ```
//!
//! The controller owns its [`TickerWindow`] exclusively and must only be
//! driven from one task at a time (see [`engine::runner`](crate::engine::runner)).
//! There is no cooldown: after a trigger, the next accepted tick that
//! extends a strictly decreasing run fires again.

use std::collections::HashMap;

use tracing::{debug, error, info};

use crate::broker::Broker;
use crate::config::{traded_pair, StrategyConfig, POSITION_AMOUNT, POSITION_RULES};
use crate::engine::trend::is_strictly_decreasing;
use crate::engine::window::TickerWindow;
use crate::events::StrategyEvent;
use crate::models::{
    Account, CurrencyPair, PositionCreationResult, PositionRequest, Tick,
};

// ─── Tick Outcome ─────────────────────────────────────────────────────────────

/// What a single ticker update led to.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The update carried no tick for the tracked pair.
    Untracked,
    /// Tick arrived before `last + interval`; window unchanged.
    Rejected,
    /// Tick stored, window not yet full.
    Waiting { len: usize },
    /// Window full but prices not strictly decreasing.
    NoTrend,
    /// Downtrend detected but the risk precondition refused.
    RiskBlocked,
    /// Position request accepted by the broker.
    Opened(PositionCreationResult),
    /// Position request rejected by the broker; reported, not raised.
    Failed { message: String },
}

impl TickOutcome {
    /// `true` when a position request was sent to the broker.
    pub fn requested(&self) -> bool {
        matches!(self, TickOutcome::Opened(_) | TickOutcome::Failed { .. })
    }
}

// ─── Controller ───────────────────────────────────────────────────────────────

pub struct StrategyController<B: Broker> {
    pair: CurrencyPair,
    window: TickerWindow,
    broker: B,
}

impl<B: Broker> StrategyController<B> {
    pub fn new(config: &StrategyConfig, broker: B) -> Self {
        Self {
            pair: traded_pair(),
            window: TickerWindow::new(config.window_capacity, config.tick_interval),
            broker,
        }
    }

    /// Pairs the market-data feed must deliver to this strategy.
    pub fn requested_pairs(&self) -> Vec<CurrencyPair> {
        vec![self.pair.clone()]
    }

    pub fn window(&self) -> &TickerWindow {
        &self.window
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    /// Single entry point for every event kind.
    ///
    /// Returns `Some(outcome)` for ticker updates, `None` for updates that
    /// are only reported.
    pub async fn handle(&mut self, event: StrategyEvent) -> Option<TickOutcome> {
        match event {
            StrategyEvent::TickerUpdate(mut tickers) => {
                Some(match tickers.remove(&self.pair) {
                    Some(tick) if tick.pair == self.pair => self.on_tick(tick).await,
                    Some(tick) => {
                        debug!(key = %self.pair, pair = %tick.pair, "Tick filed under another pair — ignored");
                        TickOutcome::Untracked
                    }
                    None => TickOutcome::Untracked,
                })
            }
            StrategyEvent::AccountsUpdate(accounts) => {
                self.on_accounts(accounts).await;
                None
            }
            StrategyEvent::OrderUpdate(orders) => {
                report(&orders, "Received information about an order");
                None
            }
            StrategyEvent::TradeUpdate(trades) => {
                report(&trades, "Received information about a trade");
                None
            }
            StrategyEvent::PositionUpdate(positions) => {
                report(&positions, "Received information about a position");
                None
            }
            StrategyEvent::PositionStatusUpdate(positions) => {
                report(&positions, "Received information about a position status");
                None
            }
        }
    }

    async fn on_accounts(&self, accounts: HashMap<String, Account>) {
        report(&accounts, "Received information about an account");

        let mut accounts: Vec<Account> = accounts.into_values().collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        self.broker.on_accounts(&accounts).await;
    }

    /// Process one tick for the tracked pair.
    pub async fn on_tick(&mut self, tick: Tick) -> TickOutcome {
        self.broker.observe_tick(&tick).await;

        let price = tick.last;
        let timestamp = tick.timestamp;

        // ── 1. Window ─────────────────────────────────────────────────────────
        if !self.window.accept(tick) {
            return TickOutcome::Rejected;
        }

        debug!(pair = %self.pair, %price, %timestamp, len = self.window.len(), "Tick accepted");

        if !self.window.is_full() {
            return TickOutcome::Waiting { len: self.window.len() };
        }

        // ── 2. Trend ──────────────────────────────────────────────────────────
        if !is_strictly_decreasing(&self.window) {
            return TickOutcome::NoTrend;
        }

        // ── 3. Risk precondition ──────────────────────────────────────────────
        if !self.broker.can_buy(&self.pair, POSITION_AMOUNT).await {
            info!(pair = %self.pair, amount = %POSITION_AMOUNT, "Downtrend detected — risk check refused");
            return TickOutcome::RiskBlocked;
        }

        // ── 4. Position request ───────────────────────────────────────────────
        let request = PositionRequest::new(self.pair.clone(), POSITION_AMOUNT, POSITION_RULES);

        info!(
            request_id = %request.request_id,
            pair       = %request.pair,
            amount     = %request.amount,
            last       = %price,
            "🎯 DOWNTREND — requesting long position"
        );

        let result = self.broker.create_long_position(&request).await;

        if result.successful {
            info!(request_id = %request.request_id, position_id = ?result.position_id, "✅ Long position created");
            TickOutcome::Opened(result)
        } else {
            let message = result
                .error_message
                .unwrap_or_else(|| "unknown error".to_string());
            error!(request_id = %request.request_id, error = %message, "❌ Long position request failed");
            TickOutcome::Failed { message }
        }
    }
}

/// One log line per record of an observability-only update.
fn report<K, V>(records: &HashMap<K, V>, what: &str)
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    for (key, record) in records {
        info!(key = ?key, record = ?record, "{what}");
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
