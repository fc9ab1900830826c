//! # events
//!
//! Defines [`StrategyEvent`] — every update the broker and market-data
//! collaborators deliver to a strategy instance, as one polymorphic type
//! dispatched through [`StrategyController::handle`](crate::engine::controller::StrategyController::handle).
//!
//! On the wire (HTTP ingress) the event is adjacently tagged:
//!
//! ```json
//! { "event": "TICKER_UPDATE",
//!   "data":  { "BTC/USDT": { "pair": "BTC/USDT", "last": "67000", "timestamp": "..." } } }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Account, CurrencyPair, Order, Position, Tick, Trade};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyEvent {
    /// Full current account set, keyed by account id.
    AccountsUpdate(HashMap<String, Account>),

    /// Latest tick per pair for one dispatch cycle.
    TickerUpdate(HashMap<CurrencyPair, Tick>),

    /// Changed orders, keyed by order id.
    OrderUpdate(HashMap<String, Order>),

    /// Changed trades, keyed by trade id.
    TradeUpdate(HashMap<String, Trade>),

    /// Changed positions, keyed by position id.
    PositionUpdate(HashMap<u64, Position>),

    /// Positions whose status changed, keyed by position id.
    PositionStatusUpdate(HashMap<u64, Position>),
}

impl StrategyEvent {
    /// Short label for logs and counters.
    pub fn kind(&self) -> &'static str {
        match self {
            StrategyEvent::AccountsUpdate(_) => "accounts",
            StrategyEvent::TickerUpdate(_) => "ticker",
            StrategyEvent::OrderUpdate(_) => "order",
            StrategyEvent::TradeUpdate(_) => "trade",
            StrategyEvent::PositionUpdate(_) => "position",
            StrategyEvent::PositionStatusUpdate(_) => "position_status",
        }
    }

    /// Convenience constructor for a single-tick ticker update.
    pub fn ticker(tick: Tick) -> Self {
        let mut tickers = HashMap::with_capacity(1);
        tickers.insert(tick.pair.clone(), tick);
        StrategyEvent::TickerUpdate(tickers)
    }
}
