//! # engine::trend
//!
//! Downtrend test over a [`TickerWindow`].

use crate::engine::window::TickerWindow;

/// `true` iff the window is full and every price is strictly lower than the
/// one before it. A single tie or uptick anywhere yields `false`.
pub fn is_strictly_decreasing(window: &TickerWindow) -> bool {
    if !window.is_full() {
        return false;
    }

    window
        .entries()
        .zip(window.entries().skip(1))
        .all(|(prev, next)| prev.last > next.last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::models::{CurrencyPair, Tick};

    fn window_of(prices: &[Decimal]) -> TickerWindow {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let mut window = TickerWindow::new(3, Duration::minutes(1));
        for (i, &p) in prices.iter().enumerate() {
            let tick = Tick::new(
                CurrencyPair::new("BTC", "USDT"),
                p,
                start + Duration::minutes(i as i64),
            );
            assert!(window.accept(tick));
        }
        window
    }

    #[test]
    fn test_strict_downtrend() {
        assert!(is_strictly_decreasing(&window_of(&[dec!(100), dec!(90), dec!(80)])));
    }

    #[test]
    fn test_tie_is_not_decreasing() {
        assert!(!is_strictly_decreasing(&window_of(&[dec!(100), dec!(100), dec!(80)])));
        assert!(!is_strictly_decreasing(&window_of(&[dec!(100), dec!(90), dec!(90)])));
    }

    #[test]
    fn test_uptick_anywhere_breaks_trend() {
        assert!(!is_strictly_decreasing(&window_of(&[dec!(100), dec!(110), dec!(80)])));
        assert!(!is_strictly_decreasing(&window_of(&[dec!(100), dec!(90), dec!(95)])));
    }

    #[test]
    fn test_partial_window_is_false() {
        assert!(!is_strictly_decreasing(&window_of(&[dec!(100), dec!(90)])));
        assert!(!is_strictly_decreasing(&window_of(&[])));
    }

    #[test]
    fn test_trend_follows_sliding_window() {
        // 120 drops out, leaving 100 > 90 > 80
        let window = window_of(&[dec!(120), dec!(130), dec!(100), dec!(90), dec!(80)]);
        assert!(is_strictly_decreasing(&window));
    }

    #[test]
    fn test_small_decimal_steps() {
        let window = window_of(&[dec!(67000.02), dec!(67000.01), dec!(67000.00)]);
        assert!(is_strictly_decreasing(&window));
    }
}
