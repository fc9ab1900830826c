//! Strategy engine: window, trend test, account rule, controller and the
//! task that drives it.

pub mod account_selector;
pub mod controller;
pub mod runner;
pub mod trend;
pub mod window;

pub use controller::{StrategyController, TickOutcome};
pub use window::TickerWindow;
