//! # engine::runner
//!
//! **Strategy Runner** — the single task that owns a [`StrategyController`].
//!
//! Producers (HTTP ingress, feed adapters) only hold a cloneable
//! [`StrategyHandle`] and enqueue events; the runner drains the queue one
//! event at a time, so the window is never touched concurrently and needs no
//! lock.
//!
//! ```text
//!  POST /api/events ─┐
//!  feed adapter  ────┼──▶ mpsc::Sender<StrategyEvent> ──▶ [runner task] ──▶ controller.handle()
//!  ...           ────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::broker::Broker;
use crate::engine::controller::{StrategyController, TickOutcome};
use crate::error::AppError;
use crate::events::StrategyEvent;

// ─── Stats ────────────────────────────────────────────────────────────────────

/// Monotonic counters updated by the runner, read by health checks.
#[derive(Debug, Default)]
pub struct RunnerStats {
    pub events: AtomicU64,
    pub ticks_accepted: AtomicU64,
    pub ticks_rejected: AtomicU64,
    pub requests: AtomicU64,
    pub failures: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub events: u64,
    pub ticks_accepted: u64,
    pub ticks_rejected: u64,
    pub requests: u64,
    pub failures: u64,
}

impl RunnerStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            events: self.events.load(Ordering::Relaxed),
            ticks_accepted: self.ticks_accepted.load(Ordering::Relaxed),
            ticks_rejected: self.ticks_rejected.load(Ordering::Relaxed),
            requests: self.requests.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    fn record(&self, outcome: &TickOutcome) {
        match outcome {
            TickOutcome::Untracked => {}
            TickOutcome::Rejected => {
                self.ticks_rejected.fetch_add(1, Ordering::Relaxed);
            }
            TickOutcome::Waiting { .. } | TickOutcome::NoTrend | TickOutcome::RiskBlocked => {
                self.ticks_accepted.fetch_add(1, Ordering::Relaxed);
            }
            TickOutcome::Opened(_) => {
                self.ticks_accepted.fetch_add(1, Ordering::Relaxed);
                self.requests.fetch_add(1, Ordering::Relaxed);
            }
            TickOutcome::Failed { .. } => {
                self.ticks_accepted.fetch_add(1, Ordering::Relaxed);
                self.requests.fetch_add(1, Ordering::Relaxed);
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

// ─── Handle ───────────────────────────────────────────────────────────────────

/// Cloneable producer side of a running strategy.
#[derive(Clone)]
pub struct StrategyHandle {
    tx: mpsc::Sender<StrategyEvent>,
    stats: Arc<RunnerStats>,
}

impl StrategyHandle {
    /// Enqueue an event; waits while the queue is full.
    pub async fn submit(&self, event: StrategyEvent) -> Result<(), AppError> {
        self.tx.send(event).await.map_err(|_| AppError::QueueClosed)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

// ─── Runner ───────────────────────────────────────────────────────────────────

/// Spawn the runner task. It exits once every [`StrategyHandle`] is dropped.
pub fn spawn<B>(
    mut controller: StrategyController<B>,
    queue_size: usize,
) -> (StrategyHandle, JoinHandle<()>)
where
    B: Broker + 'static,
{
    let (tx, mut rx) = mpsc::channel::<StrategyEvent>(queue_size.max(1));
    let stats = Arc::new(RunnerStats::default());
    let task_stats = Arc::clone(&stats);

    let task = tokio::spawn(async move {
        info!(pairs = ?controller.requested_pairs(), "▶️  Strategy runner started");

        while let Some(event) = rx.recv().await {
            task_stats.events.fetch_add(1, Ordering::Relaxed);
            let kind = event.kind();

            if let Some(outcome) = controller.handle(event).await {
                debug!(kind, ?outcome, "Event handled");
                task_stats.record(&outcome);
            }
        }

        info!(stats = ?task_stats.snapshot(), "⏹️  Strategy runner stopped — queue closed");
    });

    (StrategyHandle { tx, stats }, task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    use crate::broker::PaperBroker;
    use crate::config::{traded_pair, StrategyConfig};
    use crate::models::{Account, Balance, Tick};

    #[tokio::test]
    async fn test_runner_processes_events_in_order() {
        let config = StrategyConfig::default();
        let broker = PaperBroker::new();
        let controller = StrategyController::new(&config, broker.clone());
        let (handle, task) = spawn(controller, 8);

        let mut account = Account::new("a1", "main");
        account.balances.push(Balance { currency: "USDT".into(), available: dec!(1000) });
        let accounts = [("a1".to_string(), account)].into_iter().collect();
        handle.submit(StrategyEvent::AccountsUpdate(accounts)).await.unwrap();

        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let ticks = [
            (0, dec!(100)),
            (30, dec!(99)),
            (60, dec!(90)),
            (120, dec!(80)),
        ];
        for (secs, price) in ticks {
            let tick = Tick::new(traded_pair(), price, t0 + Duration::seconds(secs));
            handle.submit(StrategyEvent::ticker(tick)).await.unwrap();
        }

        // closing the last handle lets the runner drain the queue and exit
        let stats = Arc::clone(&handle.stats);
        drop(handle);
        task.await.unwrap();

        let stats = stats.snapshot();
        assert_eq!(stats.events, 5);
        assert_eq!(stats.ticks_accepted, 3);
        assert_eq!(stats.ticks_rejected, 1);
        assert_eq!(stats.requests, 1);
        assert_eq!(stats.failures, 0);

        let account = broker.selected_account().await.unwrap();
        assert_eq!(account.available("BTC"), dec!(0.001));
        assert_eq!(account.available("USDT"), dec!(999.920));
    }

    #[tokio::test]
    async fn test_runner_survives_ticks_at_end_of_time() {
        let controller = StrategyController::new(&StrategyConfig::default(), PaperBroker::new());
        let (handle, task) = spawn(controller, 4);

        let end = chrono::DateTime::<Utc>::MAX_UTC;
        for price in [dec!(100), dec!(90)] {
            let tick = Tick::new(traded_pair(), price, end);
            handle.submit(StrategyEvent::ticker(tick)).await.unwrap();
        }
        let tick = Tick::new(traded_pair(), dec!(80), Utc::now());
        handle.submit(StrategyEvent::ticker(tick)).await.unwrap();

        let stats = Arc::clone(&handle.stats);
        drop(handle);
        task.await.unwrap();

        let stats = stats.snapshot();
        assert_eq!(stats.events, 3);
        assert_eq!(stats.ticks_accepted, 1);
        assert_eq!(stats.ticks_rejected, 2);
    }

    #[tokio::test]
    async fn test_submit_after_runner_stopped_fails() {
        let controller = StrategyController::new(&StrategyConfig::default(), PaperBroker::new());
        let (handle, task) = spawn(controller, 1);
        task.abort();
        let _ = task.await;

        let tick = Tick::new(traded_pair(), dec!(1), Utc::now());
        let err = handle.submit(StrategyEvent::ticker(tick)).await.unwrap_err();
        assert!(matches!(err, AppError::QueueClosed));
    }
}
