// In crates/strategy/src/indicators.rs

use core_types::Candle;
use num_traits::cast::ToPrimitive;
use rust_decimal::Decimal;

/// Simple moving average over the trailing `period` closes.
///
/// Returns `None` when the window is shorter than `period`; the caller is
/// expected to degrade, not fail.
pub fn sma(candles: &[Candle], period: usize) -> Option<Decimal> {
    if period == 0 || candles.len() < period {
        return None;
    }

    let sum: Decimal = candles[candles.len() - period..]
        .iter()
        .map(|c| c.close)
        .sum();

    Some(sum / Decimal::from(period as u64))
}

/// Simple-window RSI over the trailing `period` close-to-close changes.
///
/// This recomputes gains/losses from scratch over the window on every call.
/// It is deliberately NOT the Wilder-smoothed RSI: there is no smoothing
/// continuity between ticks, and callers must not assume any. Changing this
/// to the smoothed variant would silently change signal behavior.
pub fn rsi(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;

    for window in candles[candles.len() - period - 1..].windows(2) {
        let change = (window[1].close - window[0].close).to_f64().unwrap_or(0.0);
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    // A lossless window is pinned to exactly 100 rather than dividing by zero.
    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Average true range: the plain mean of the true range over the trailing
/// `period` candles (no Wilder smoothing here either).
pub fn atr(candles: &[Candle], period: usize) -> Option<Decimal> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let start = candles.len() - period;
    let mut total = Decimal::ZERO;

    for i in start..candles.len() {
        let prev_close = candles[i - 1].close;
        let tr = (candles[i].high - candles[i].low)
            .max((candles[i].high - prev_close).abs())
            .max((candles[i].low - prev_close).abs());
        total += tr;
    }

    Some(total / Decimal::from(period as u64))
}
