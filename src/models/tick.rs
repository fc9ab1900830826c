//! # models::tick
//!
//! Defines [`CurrencyPair`] and [`Tick`], the price observation the market
//! feed delivers for every dispatch cycle.
//!
//! A `CurrencyPair` travels on the wire as `"BASE/QUOTE"` so that it can be
//! used as a JSON map key in [`TickerUpdate`](crate::events::StrategyEvent)
//! payloads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ─── CurrencyPair ─────────────────────────────────────────────────────────────

/// Base/quote pair, e.g. `BTC/USDT` (buy BTC, pay in USDT).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: base.to_ascii_uppercase(),
            quote: quote.to_ascii_uppercase(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((base, quote)) if !base.trim().is_empty() && !quote.trim().is_empty() => {
                Ok(Self::new(base.trim(), quote.trim()))
            }
            _ => Err(format!("invalid currency pair '{s}', expected BASE/QUOTE")),
        }
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.to_string()
    }
}

// ─── Tick ─────────────────────────────────────────────────────────────────────

/// One price observation for a pair.
///
/// Only the last traded price matters to the downtrend strategy; bid/ask
/// are not carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub pair: CurrencyPair,

    /// Last trade price, in quote currency.
    pub last: Decimal,

    /// UTC time at which the exchange recorded the price.
    pub timestamp: DateTime<Utc>,
}

impl Tick {
    pub fn new(pair: CurrencyPair, last: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self { pair, last, timestamp }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_round_trips_through_display() {
        let pair: CurrencyPair = "btc/usdt".parse().unwrap();
        assert_eq!(pair, CurrencyPair::new("BTC", "USDT"));
        assert_eq!(pair.to_string(), "BTC/USDT");
    }

    #[test]
    fn test_pair_rejects_missing_quote() {
        assert!("BTC".parse::<CurrencyPair>().is_err());
        assert!("BTC/".parse::<CurrencyPair>().is_err());
    }

    #[test]
    fn test_tick_deserializes_numeric_price() {
        let tick: Tick = serde_json::from_str(
            r#"{"pair":"BTC/USDT","last":67000.5,"timestamp":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(tick.pair.base, "BTC");
        assert_eq!(tick.last.to_string(), "67000.5");
    }
}
