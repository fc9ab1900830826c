//! # engine::window
//!
//! **Ticker Window** — fixed-capacity FIFO of the most recent accepted ticks
//! for one pair, oldest first.
//!
//! A tick only enters the window when at least `interval` has elapsed since
//! the previously accepted one, so the window always samples the market at
//! (no finer than) the configured cadence. Early ticks are dropped silently.

use std::collections::VecDeque;

use chrono::Duration;
use tracing::debug;

use crate::models::Tick;

/// Smallest window that can show a trend.
pub const MIN_CAPACITY: usize = 2;

#[derive(Debug, Clone)]
pub struct TickerWindow {
    ticks: VecDeque<Tick>,
    capacity: usize,
    interval: Duration,
}

impl TickerWindow {
    /// Empty window. `capacity` is clamped to at least [`MIN_CAPACITY`].
    pub fn new(capacity: usize, interval: Duration) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            ticks: VecDeque::with_capacity(capacity),
            capacity,
            interval,
        }
    }

    /// Try to store `tick`. Returns `true` if it was stored.
    ///
    /// The first tick is always stored. Later ticks need
    /// `tick.timestamp >= last.timestamp + interval`; at capacity the oldest
    /// entry is evicted first. A rejected tick leaves the window untouched.
    ///
    /// When `last + interval` is past the end of time, nothing can ever be
    /// due again and every later tick is rejected.
    pub fn accept(&mut self, tick: Tick) -> bool {
        if let Some(last) = self.ticks.back() {
            let Some(due) = last.timestamp.checked_add_signed(self.interval) else {
                debug!(
                    pair = %tick.pair,
                    timestamp = %tick.timestamp,
                    last = %last.timestamp,
                    "Next due time out of range — tick dropped"
                );
                return false;
            };
            if tick.timestamp < due {
                debug!(
                    pair = %tick.pair,
                    timestamp = %tick.timestamp,
                    due = %due,
                    "Tick too early — dropped"
                );
                return false;
            }
        }

        if self.ticks.len() == self.capacity {
            self.ticks.pop_front();
        }
        self.ticks.push_back(tick);
        true
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ticks.len() == self.capacity
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently accepted tick.
    pub fn last(&self) -> Option<&Tick> {
        self.ticks.back()
    }

    /// Entries oldest → newest.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &Tick> {
        self.ticks.iter()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
