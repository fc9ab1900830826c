//! # broker
//!
//! The collaborator seam between the strategy and the outside world:
//! account selection, risk precondition and position execution.
//!
//! Two implementations ship with the crate:
//! * [`paper::PaperBroker`]  — in-process simulated account (default)
//! * [`bridge::BridgeBroker`] — HTTP bridge to a real exchange adapter

pub mod bridge;
pub mod paper;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::{Account, CurrencyPair, PositionCreationResult, PositionRequest, Tick};

pub use bridge::BridgeBroker;
pub use paper::PaperBroker;

/// Everything the strategy needs from a broker connection.
///
/// Implementations own their own timeouts and error mapping: transport
/// failures surface as `false` from [`can_buy`](Broker::can_buy) or as an
/// unsuccessful [`PositionCreationResult`], never as a panic.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Latest full account set. Implementations apply
    /// [`select_trade_account`](crate::engine::account_selector::select_trade_account).
    async fn on_accounts(&self, accounts: &[Account]);

    /// Whether the selected account can afford `amount` of `pair.base`.
    async fn can_buy(&self, pair: &CurrencyPair, amount: Decimal) -> bool;

    /// Open a long position with the request's protective rules.
    async fn create_long_position(&self, request: &PositionRequest) -> PositionCreationResult;

    /// Mark-price hook, called for every tick of the tracked pair.
    async fn observe_tick(&self, _tick: &Tick) {}
}
