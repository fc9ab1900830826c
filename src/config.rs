//! # config — strategy constants and environment-driven settings
//!
//! The traded pair, amount and position rules are fixed for the lifetime of
//! the strategy and live here as constants. Everything operational (bind
//! address, broker, window shape, paper balances) comes from the environment.
//!
//! | Variable             | Default             | Description                          |
//! |----------------------|---------------------|--------------------------------------|
//! | `BIND_ADDR`          | `0.0.0.0:3000`      | Event ingress listen address         |
//! | `BROKER_URL`         | `paper`             | `paper` or base URL of a bridge      |
//! | `WINDOW_CAPACITY`    | `3`                 | Ticks kept for the trend test        |
//! | `TICK_INTERVAL_SECS` | `60`                | Minimum gap between accepted ticks   |
//! | `PAPER_BALANCES`     | `USDT=1000,BTC=0`   | Seed balances of the paper account   |
//! | `EVENT_QUEUE_SIZE`   | `256`               | Bounded event queue length           |

use std::net::SocketAddr;

use anyhow::{bail, Context};
use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::engine::window::MIN_CAPACITY;
use crate::models::{Balance, CurrencyPair, PositionRules};

// ─── Strategy Constants ───────────────────────────────────────────────────────

pub const BASE_CURRENCY: &str = "BTC";
pub const QUOTE_CURRENCY: &str = "USDT";

/// Base-currency amount bought on every trigger.
pub const POSITION_AMOUNT: Decimal = dec!(0.001);

/// +4% take profit, −8% stop loss.
pub const POSITION_RULES: PositionRules = PositionRules::new(4.0, 8.0);

pub fn traded_pair() -> CurrencyPair {
    CurrencyPair::new(BASE_CURRENCY, QUOTE_CURRENCY)
}

// ─── Broker Selection ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum BrokerMode {
    Paper,
    Bridge(String),
}

impl std::fmt::Display for BrokerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrokerMode::Paper => write!(f, "paper"),
            BrokerMode::Bridge(url) => write!(f, "bridge({url})"),
        }
    }
}

// ─── StrategyConfig ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub bind_addr: SocketAddr,
    pub broker: BrokerMode,
    pub window_capacity: usize,
    pub tick_interval: Duration,
    pub paper_balances: Vec<Balance>,
    pub event_queue_size: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            broker: BrokerMode::Paper,
            window_capacity: 3,
            tick_interval: Duration::minutes(1),
            paper_balances: vec![
                Balance { currency: QUOTE_CURRENCY.to_string(), available: dec!(1000) },
                Balance { currency: BASE_CURRENCY.to_string(), available: Decimal::ZERO },
            ],
            event_queue_size: 256,
        }
    }
}

impl StrategyConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = match std::env::var("BIND_ADDR") {
            Ok(v) => v.parse().context("BIND_ADDR must be host:port")?,
            Err(_) => defaults.bind_addr,
        };

        let broker = match std::env::var("BROKER_URL") {
            Ok(v) if !v.eq_ignore_ascii_case("paper") => BrokerMode::Bridge(v),
            _ => BrokerMode::Paper,
        };

        let window_capacity = env_parse("WINDOW_CAPACITY", defaults.window_capacity)?;
        if window_capacity < MIN_CAPACITY {
            bail!("WINDOW_CAPACITY must be at least {MIN_CAPACITY}, got {window_capacity}");
        }

        let tick_interval = interval_from_secs(env_parse("TICK_INTERVAL_SECS", 60)?)?;

        let paper_balances = match std::env::var("PAPER_BALANCES") {
            Ok(v) => parse_balances(&v)?,
            Err(_) => defaults.paper_balances,
        };

        Ok(Self {
            bind_addr,
            broker,
            window_capacity,
            tick_interval,
            paper_balances,
            event_queue_size: env_parse("EVENT_QUEUE_SIZE", defaults.event_queue_size)?.max(1),
        })
    }
}

/// `TICK_INTERVAL_SECS` → interval; negative or out-of-range values are errors.
pub fn interval_from_secs(secs: i64) -> anyhow::Result<Duration> {
    if secs < 0 {
        bail!("TICK_INTERVAL_SECS must not be negative, got {secs}");
    }
    Duration::try_seconds(secs)
        .with_context(|| format!("TICK_INTERVAL_SECS is out of range: {secs}"))
}

fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: '{v}'")),
        Err(_) => Ok(default),
    }
}

/// `"USDT=1000,BTC=0.5"` → balances.
pub fn parse_balances(raw: &str) -> anyhow::Result<Vec<Balance>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (currency, amount) = entry
                .split_once('=')
                .with_context(|| format!("balance '{entry}' must look like CUR=AMOUNT"))?;
            let available: Decimal = amount
                .trim()
                .parse()
                .with_context(|| format!("balance amount '{amount}' is not a decimal"))?;
            Ok(Balance {
                currency: currency.trim().to_ascii_uppercase(),
                available,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_constants() {
        assert_eq!(traded_pair().to_string(), "BTC/USDT");
        assert_eq!(POSITION_AMOUNT, dec!(0.001));
        assert_eq!(POSITION_RULES.stop_gain_percentage, 4.0);
        assert_eq!(POSITION_RULES.stop_loss_percentage, 8.0);
    }

    #[test]
    fn test_defaults() {
        let config = StrategyConfig::default();
        assert_eq!(config.window_capacity, 3);
        assert_eq!(config.tick_interval, Duration::minutes(1));
        assert_eq!(config.broker, BrokerMode::Paper);
    }

    #[test]
    fn test_interval_from_secs() {
        assert_eq!(interval_from_secs(0).unwrap(), Duration::zero());
        assert_eq!(interval_from_secs(60).unwrap(), Duration::minutes(1));
        assert!(interval_from_secs(-1).is_err());
        assert!(interval_from_secs(i64::MAX).is_err());
        assert!(interval_from_secs(i64::MAX / 1000 + 1).is_err());
    }

    #[test]
    fn test_parse_balances() {
        let balances = parse_balances("usdt=250.5, BTC=0").unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].currency, "USDT");
        assert_eq!(balances[0].available, dec!(250.5));
        assert_eq!(balances[1].available, Decimal::ZERO);
    }

    #[test]
    fn test_parse_balances_rejects_garbage() {
        assert!(parse_balances("USDT").is_err());
        assert!(parse_balances("USDT=lots").is_err());
    }
}
