//! # broker::paper
//!
//! **Paper Broker** — simulated exchange account kept in memory.
//!
//! * applies the trade-account rule on every account-set update
//! * tracks the mark price per pair from observed ticks
//! * `can_buy` = selected account's quote balance ≥ amount × mark
//! * opening a position debits quote and credits base at the mark price

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::broker::Broker;
use crate::engine::account_selector::select_trade_account;
use crate::models::{
    Account, Balance, CurrencyPair, PositionCreationResult, PositionRequest, Tick,
};

// ─── Internal State ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PaperInner {
    accounts: Vec<Account>,
    selected_id: Option<String>,
    marks: HashMap<CurrencyPair, Decimal>,
    next_position_id: u64,
}

impl PaperInner {
    fn selected_mut(&mut self) -> Option<&mut Account> {
        let id = self.selected_id.as_deref()?;
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    fn selected(&self) -> Option<&Account> {
        let id = self.selected_id.as_deref()?;
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Quote-currency cost of `amount` at the current mark, if known.
    fn cost(&self, pair: &CurrencyPair, amount: Decimal) -> Option<Decimal> {
        self.marks.get(pair).map(|mark| *mark * amount)
    }
}

// ─── Paper Broker ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct PaperBroker {
    inner: Arc<RwLock<PaperInner>>,
}

impl PaperBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected trade account (cloned out of the lock).
    pub async fn selected_account(&self) -> Option<Account> {
        self.inner.read().await.selected().cloned()
    }

    pub async fn mark_price(&self, pair: &CurrencyPair) -> Option<Decimal> {
        self.inner.read().await.marks.get(pair).copied()
    }
}

fn credit(account: &mut Account, currency: &str, delta: Decimal) {
    match account
        .balances
        .iter_mut()
        .find(|b| b.currency.eq_ignore_ascii_case(currency))
    {
        Some(balance) => balance.available += delta,
        None => account.balances.push(Balance {
            currency: currency.to_string(),
            available: delta,
        }),
    }
}

#[async_trait]
impl Broker for PaperBroker {
    async fn on_accounts(&self, accounts: &[Account]) {
        let mut inner = self.inner.write().await;
        inner.accounts = accounts.to_vec();
        let selected = select_trade_account(&inner.accounts).map(|a| a.id.clone());
        inner.selected_id = selected;

        match inner.selected_id.as_deref() {
            Some(id) => info!(account_id = id, "🏦 [PAPER] Trade account selected"),
            None => warn!(
                accounts = inner.accounts.len(),
                "🏦 [PAPER] No trade account selectable — buys will be refused"
            ),
        }
    }

    async fn can_buy(&self, pair: &CurrencyPair, amount: Decimal) -> bool {
        let inner = self.inner.read().await;

        let Some(account) = inner.selected() else {
            debug!(pair = %pair, "can_buy: no trade account");
            return false;
        };
        let Some(cost) = inner.cost(pair, amount) else {
            debug!(pair = %pair, "can_buy: no mark price yet");
            return false;
        };

        let available = account.available(&pair.quote);
        debug!(pair = %pair, %amount, %cost, %available, "can_buy evaluated");
        available >= cost
    }

    async fn create_long_position(&self, request: &PositionRequest) -> PositionCreationResult {
        let mut inner = self.inner.write().await;

        let Some(cost) = inner.cost(&request.pair, request.amount) else {
            return PositionCreationResult::failed(format!("no mark price for {}", request.pair));
        };

        {
            let Some(account) = inner.selected_mut() else {
                return PositionCreationResult::failed("no trade account selected");
            };

            if account.available(&request.pair.quote) < cost {
                return PositionCreationResult::failed(format!(
                    "insufficient {} balance for cost {cost}",
                    request.pair.quote
                ));
            }

            credit(account, &request.pair.quote, -cost);
            credit(account, &request.pair.base, request.amount);
        }

        inner.next_position_id += 1;
        let position_id = inner.next_position_id;

        info!(
            request_id  = %request.request_id,
            position_id,
            pair        = %request.pair,
            amount      = %request.amount,
            %cost,
            stop_gain   = request.rules.stop_gain_percentage,
            stop_loss   = request.rules.stop_loss_percentage,
            "📈 [PAPER] Long position opened"
        );

        PositionCreationResult::opened(position_id)
    }

    async fn observe_tick(&self, tick: &Tick) {
        let mut inner = self.inner.write().await;
        inner.marks.insert(tick.pair.clone(), tick.last);
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::models::PositionRules;

    fn pair() -> CurrencyPair {
        CurrencyPair::new("BTC", "USDT")
    }

    fn funded(id: &str, name: &str, usdt: Decimal) -> Account {
        let mut account = Account::new(id, name);
        account.balances.push(Balance { currency: "USDT".into(), available: usdt });
        account
    }

    async fn broker_with_mark(accounts: &[Account], mark: Decimal) -> PaperBroker {
        let broker = PaperBroker::new();
        broker.on_accounts(accounts).await;
        broker.observe_tick(&Tick::new(pair(), mark, Utc::now())).await;
        broker
    }

    #[tokio::test]
    async fn test_can_buy_with_enough_quote_balance() {
        let broker = broker_with_mark(&[funded("a1", "main", dec!(100))], dec!(60000)).await;
        assert!(broker.can_buy(&pair(), dec!(0.001)).await);
    }

    #[tokio::test]
    async fn test_cannot_buy_when_short_of_funds() {
        let broker = broker_with_mark(&[funded("a1", "main", dec!(50))], dec!(60000)).await;
        assert!(!broker.can_buy(&pair(), dec!(0.001)).await);
    }

    #[tokio::test]
    async fn test_cannot_buy_without_mark_price() {
        let broker = PaperBroker::new();
        broker.on_accounts(&[funded("a1", "main", dec!(1000))]).await;
        assert!(!broker.can_buy(&pair(), dec!(0.001)).await);
    }

    #[tokio::test]
    async fn test_cannot_buy_without_selectable_account() {
        let accounts = [funded("a1", "main", dec!(1000)), funded("a2", "savings", dec!(1000))];
        let broker = broker_with_mark(&accounts, dec!(60000)).await;
        assert!(broker.selected_account().await.is_none());
        assert!(!broker.can_buy(&pair(), dec!(0.001)).await);
    }

    #[tokio::test]
    async fn test_later_account_update_changes_selection() {
        let broker = broker_with_mark(&[funded("a1", "main", dec!(0))], dec!(60000)).await;
        assert!(!broker.can_buy(&pair(), dec!(0.001)).await);

        broker
            .on_accounts(&[funded("a1", "main", dec!(0)), funded("a2", "Trade", dec!(500))])
            .await;
        assert_eq!(broker.selected_account().await.map(|a| a.id), Some("a2".to_string()));
        assert!(broker.can_buy(&pair(), dec!(0.001)).await);
    }

    #[tokio::test]
    async fn test_open_position_moves_balances() {
        let broker = broker_with_mark(&[funded("a1", "main", dec!(100))], dec!(60000)).await;
        let request = PositionRequest::new(pair(), dec!(0.001), PositionRules::new(4.0, 8.0));

        let first = broker.create_long_position(&request).await;
        assert_eq!(first, PositionCreationResult::opened(1));

        let account = broker.selected_account().await.unwrap();
        assert_eq!(account.available("USDT"), dec!(40));
        assert_eq!(account.available("BTC"), dec!(0.001));

        // 40 USDT left, 60 needed
        let second = broker.create_long_position(&request).await;
        assert!(!second.successful);
        assert!(second.error_message.unwrap().contains("insufficient USDT"));
    }
}
