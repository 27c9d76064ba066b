// In crates/strategy/src/pivot.rs

use core_types::Candle;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotKind {
    High,
    Low,
}

/// A confirmed swing extremum. Transient: recomputed every tick, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotPoint {
    pub price: Decimal,
    pub kind: PivotKind,
}

/// The most recent confirmed swing high.
///
/// The candidate bar sits `length` candles back from the latest candle and is
/// a pivot iff its high is strictly greater than every high in the symmetric
/// window of `length` candles on each side. Needs `2*length + 1` candles;
/// returns `None` otherwise. Memoryless: only the latest fully-confirmed
/// pivot is ever reported.
pub fn pivot_high(candles: &[Candle], length: usize) -> Option<PivotPoint> {
    if length == 0 || candles.len() < 2 * length + 1 {
        return None;
    }

    let center = candles.len() - length - 1;
    let center_high = candles[center].high;

    for (offset, candle) in candles[center - length..=center + length].iter().enumerate() {
        if offset == length {
            continue;
        }
        if candle.high >= center_high {
            return None;
        }
    }

    Some(PivotPoint {
        price: center_high,
        kind: PivotKind::High,
    })
}

/// Mirror of [`pivot_high`]: strictly lower than every low on both sides.
pub fn pivot_low(candles: &[Candle], length: usize) -> Option<PivotPoint> {
    if length == 0 || candles.len() < 2 * length + 1 {
        return None;
    }

    let center = candles.len() - length - 1;
    let center_low = candles[center].low;

    for (offset, candle) in candles[center - length..=center + length].iter().enumerate() {
        if offset == length {
            continue;
        }
        if candle.low <= center_low {
            return None;
        }
    }

    Some(PivotPoint {
        price: center_low,
        kind: PivotKind::Low,
    })
}
