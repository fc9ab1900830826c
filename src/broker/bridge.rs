//! # broker::bridge
//!
//! **Bridge Broker** — forwards risk checks and position requests to an
//! exchange adapter over HTTP.
//!
//! ## Bridge API Contract
//! ```text
//! POST {base}/risk/can-buy       { account_id, pair, amount }          → { "can_buy": bool }
//! POST {base}/positions/long     { account_id, request_id, pair, ... } → PositionCreationResult
//! ```
//! The trade account is selected locally from the latest account update and
//! sent with every call; with no selection the bridge is not contacted.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::broker::Broker;
use crate::engine::account_selector::select_trade_account;
use crate::error::AppError;
use crate::models::{Account, CurrencyPair, PositionCreationResult, PositionRequest, PositionRules};

/// Per-call timeout towards the bridge.
const BRIDGE_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Wire Types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CanBuyRequest<'a> {
    account_id: &'a str,
    pair: &'a CurrencyPair,
    amount: Decimal,
}

#[derive(Debug, Deserialize)]
struct CanBuyResponse {
    can_buy: bool,
}

#[derive(Debug, Serialize)]
struct LongPositionRequest<'a> {
    account_id: &'a str,
    request_id: uuid::Uuid,
    pair: &'a CurrencyPair,
    amount: Decimal,
    rules: PositionRules,
}

// ─── Bridge Broker ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct BridgeBroker {
    client: reqwest::Client,
    base_url: String,
    trade_account: Arc<RwLock<Option<Account>>>,
}

impl BridgeBroker {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            trade_account: Arc::new(RwLock::new(None)),
        }
    }

    async fn trade_account_id(&self) -> Option<String> {
        self.trade_account.read().await.as_ref().map(|a| a.id.clone())
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, AppError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .timeout(BRIDGE_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::Broker(format!("bridge unreachable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Broker(format!("bridge HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Broker(format!("bridge response parse error: {e}")))
    }
}

#[async_trait]
impl Broker for BridgeBroker {
    async fn on_accounts(&self, accounts: &[Account]) {
        let selected = select_trade_account(accounts).cloned();
        match &selected {
            Some(account) => info!(account_id = %account.id, "🏦 [BRIDGE] Trade account selected"),
            None => warn!(accounts = accounts.len(), "🏦 [BRIDGE] No trade account selectable"),
        }
        *self.trade_account.write().await = selected;
    }

    async fn can_buy(&self, pair: &CurrencyPair, amount: Decimal) -> bool {
        let Some(account_id) = self.trade_account_id().await else {
            return false;
        };

        let body = CanBuyRequest { account_id: &account_id, pair, amount };
        match self.post::<_, CanBuyResponse>("/risk/can-buy", &body).await {
            Ok(resp) => resp.can_buy,
            Err(e) => {
                warn!(error = %e, "can_buy check failed — treating as refused");
                false
            }
        }
    }

    async fn create_long_position(&self, request: &PositionRequest) -> PositionCreationResult {
        let Some(account_id) = self.trade_account_id().await else {
            return PositionCreationResult::failed("no trade account selected");
        };

        let body = LongPositionRequest {
            account_id: &account_id,
            request_id: request.request_id,
            pair: &request.pair,
            amount: request.amount,
            rules: request.rules,
        };

        info!(
            request_id = %request.request_id,
            pair       = %request.pair,
            amount     = %request.amount,
            url        = %self.base_url,
            "🚀 [BRIDGE] Sending long position request"
        );

        match self.post::<_, PositionCreationResult>("/positions/long", &body).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, request_id = %request.request_id, "Bridge call failed");
                PositionCreationResult::failed(e.to_string())
            }
        }
    }
}
