//! # Downtick — downtrend-entry strategy core
//!
//! Watches one pair (BTC/USDT), samples the last price at most once per
//! interval into a three-tick window, and asks the broker to open a fixed
//! long position whenever the window is strictly decreasing and the risk
//! check passes.
//!
//! ```text
//!  feed / broker adapters ──POST /api/events──▶ StrategyHandle ──mpsc──▶ runner task
//!                                                                        │
//!                                           StrategyController ◀─────────┘
//!                                             ├─ TickerWindow
//!                                             ├─ is_strictly_decreasing
//!                                             └─ Broker (paper | bridge)
//!                                                  ├─ select_trade_account
//!                                                  ├─ can_buy
//!                                                  └─ create_long_position
//! ```

pub mod broker;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod models;
pub mod routes;
pub mod state;
