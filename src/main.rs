//! # Downtick — strategy service entry point
//!
//! Loads configuration, picks the broker (paper or HTTP bridge), spawns the
//! strategy runner and serves the event ingress until Ctrl-C.
//!
//! `RUST_LOG` overrides the default `downtick=debug,tower_http=info` filter.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use downtick::{
    broker::{Broker, BridgeBroker, PaperBroker},
    config::{traded_pair, BrokerMode, StrategyConfig, POSITION_AMOUNT, POSITION_RULES},
    engine::{runner, StrategyController},
    models::Account,
    routes::router,
    state::build_state,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("downtick=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    // ── 3. Config ─────────────────────────────────────────────────────────────
    let config = StrategyConfig::from_env().context("Failed to load config")?;

    info!(
        pair      = %traded_pair(),
        amount    = %POSITION_AMOUNT,
        stop_gain = POSITION_RULES.stop_gain_percentage,
        stop_loss = POSITION_RULES.stop_loss_percentage,
        window    = config.window_capacity,
        interval  = config.tick_interval.num_seconds(),
        broker    = %config.broker,
        "📉 Downtick strategy starting"
    );

    // ── 4. Broker ─────────────────────────────────────────────────────────────
    match config.broker.clone() {
        BrokerMode::Paper => {
            let broker = PaperBroker::new();
            let mut account = Account::new("paper", "trade");
            account.balances = config.paper_balances.clone();
            broker.on_accounts(&[account]).await;
            serve(config, broker).await
        }
        BrokerMode::Bridge(url) => {
            let broker = BridgeBroker::new(reqwest::Client::new(), &url);
            serve(config, broker).await
        }
    }
}

/// Spawn the runner for `broker` and serve HTTP until Ctrl-C.
async fn serve<B: Broker + 'static>(config: StrategyConfig, broker: B) -> anyhow::Result<()> {
    let controller = StrategyController::new(&config, broker);
    let (handle, runner_task) = runner::spawn(controller, config.event_queue_size);

    let addr = config.bind_addr;
    let app = router(build_state(handle, config));

    info!(?addr, "🚀 Event ingress listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;

    // the router (and with it the last StrategyHandle) is gone; let the
    // runner drain what is still queued
    runner_task.await.context("Strategy runner panicked")?;
    Ok(())
}
