//! Domain models shared across the strategy.

pub mod account;
pub mod order;
pub mod position;
pub mod tick;

pub use account::{Account, Balance};
pub use order::{Order, Side, Trade};
pub use position::{
    Position, PositionCreationResult, PositionRequest, PositionRules, PositionStatus,
};
pub use tick::{CurrencyPair, Tick};
