//! # models::account
//!
//! Broker accounts as reported on every account-set change. Read-only from
//! the strategy's point of view.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Available funds in a single currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub currency: String,
    pub available: Decimal,
}

/// A broker account (e.g. "main", "trade", "margin").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub balances: Vec<Balance>,
}

impl Account {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            balances: Vec::new(),
        }
    }

    /// Available amount for `currency`, zero when the account holds none.
    pub fn available(&self, currency: &str) -> Decimal {
        self.balances
            .iter()
            .find(|b| b.currency.eq_ignore_ascii_case(currency))
            .map(|b| b.available)
            .unwrap_or(Decimal::ZERO)
    }
}
