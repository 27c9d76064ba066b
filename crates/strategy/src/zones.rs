// In crates/strategy/src/zones.rs

use core_types::{Candle, ZoneKind};
use num_traits::cast::ToPrimitive;
use rust_decimal::Decimal;

use crate::structure::Bias;

/// A price band the current candle may pull back into. Transient: recomputed
/// every tick from the candle window.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub top: Decimal,
    pub bottom: Decimal,
    pub kind: ZoneKind,
    pub side: Bias,
    /// Gap size in percent; only meaningful for fair-value gaps.
    pub gap_size: Option<f64>,
}

impl Zone {
    /// The pullback test: true when the candle's high/low range overlaps the
    /// `[bottom, top]` band, inclusive on both edges.
    pub fn overlaps(&self, candle: &Candle) -> bool {
        candle.low <= self.top && candle.high >= self.bottom
    }
}

/// Bullish fair-value gap: the current candle's low clears the high of the
/// candle two bars earlier, leaving an untraded band `[high(t-2), low(t)]`.
/// The gap only counts when its size (relative to `high(t-2)`) reaches
/// `min_size` percent.
pub fn bullish_fvg(candles: &[Candle], min_size: f64) -> Option<Zone> {
    if candles.len() < 3 {
        return None;
    }

    let current = &candles[candles.len() - 1];
    let prior = &candles[candles.len() - 3];

    if prior.high <= Decimal::ZERO || current.low <= prior.high {
        return None;
    }

    let gap_size = ((current.low - prior.high) / prior.high * Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(0.0);
    if gap_size < min_size {
        return None;
    }

    Some(Zone {
        top: current.low,
        bottom: prior.high,
        kind: ZoneKind::Fvg,
        side: Bias::Bullish,
        gap_size: Some(gap_size),
    })
}

/// Mirror of [`bullish_fvg`]: the current candle's high stays under the low
/// of the candle two bars earlier; the gap is measured against `low(t-2)`.
pub fn bearish_fvg(candles: &[Candle], min_size: f64) -> Option<Zone> {
    if candles.len() < 3 {
        return None;
    }

    let current = &candles[candles.len() - 1];
    let prior = &candles[candles.len() - 3];

    if prior.low <= Decimal::ZERO || current.high >= prior.low {
        return None;
    }

    let gap_size = ((prior.low - current.high) / prior.low * Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(0.0);
    if gap_size < min_size {
        return None;
    }

    Some(Zone {
        top: prior.low,
        bottom: current.high,
        kind: ZoneKind::Fvg,
        side: Bias::Bearish,
        gap_size: Some(gap_size),
    })
}

/// Bullish order block: walking backward up to `lookback` candles, the most
/// recent bearish candle whose close the (bullish) current candle has cleared.
/// The nearest qualifying candle wins, not the largest zone.
pub fn bullish_order_block(candles: &[Candle], lookback: usize) -> Option<Zone> {
    if lookback == 0 || candles.len() < lookback + 1 {
        return None;
    }

    let current = &candles[candles.len() - 1];
    if !current.is_bullish() {
        return None;
    }

    let scan_start = candles.len() - 1 - lookback;
    for candle in candles[scan_start..candles.len() - 1].iter().rev() {
        if candle.is_bearish() && current.close > candle.close {
            return Some(Zone {
                top: candle.high,
                bottom: candle.low,
                kind: ZoneKind::OrderBlock,
                side: Bias::Bullish,
                gap_size: None,
            });
        }
    }

    None
}

/// Mirror of [`bullish_order_block`]: the most recent bullish candle before a
/// bearish breakout close.
pub fn bearish_order_block(candles: &[Candle], lookback: usize) -> Option<Zone> {
    if lookback == 0 || candles.len() < lookback + 1 {
        return None;
    }

    let current = &candles[candles.len() - 1];
    if !current.is_bearish() {
        return None;
    }

    let scan_start = candles.len() - 1 - lookback;
    for candle in candles[scan_start..candles.len() - 1].iter().rev() {
        if candle.is_bullish() && current.close < candle.close {
            return Some(Zone {
                top: candle.high,
                bottom: candle.low,
                kind: ZoneKind::OrderBlock,
                side: Bias::Bearish,
                gap_size: None,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            open_time: 0,
            open: Decimal::try_from(open).unwrap(),
            high: Decimal::try_from(high).unwrap(),
            low: Decimal::try_from(low).unwrap(),
            close: Decimal::try_from(close).unwrap(),
            volume: dec!(1),
        }
    }

    #[test]
    fn bullish_fvg_at_exactly_the_documented_gap() {
        // high(t-2) = 100, low(t) = 100.2 -> gap 0.20% against a 0.15% floor.
        let candles = vec![
            candle(99.0, 100.0, 98.0, 99.5),
            candle(99.5, 100.5, 99.0, 100.0),
            candle(100.3, 101.0, 100.2, 100.8),
        ];
        let zone = bullish_fvg(&candles, 0.15).unwrap();
        assert_eq!(zone.bottom, dec!(100));
        assert_eq!(zone.top, dec!(100.2));
        assert_eq!(zone.kind, ZoneKind::Fvg);
        let gap = zone.gap_size.unwrap();
        assert!((gap - 0.2).abs() < 1e-9, "expected 0.20%, got {gap}");
    }

    #[test]
    fn bullish_fvg_below_the_minimum_size_is_invalid() {
        // low(t) = 100.1 -> gap 0.10%, under the 0.15% floor.
        let candles = vec![
            candle(99.0, 100.0, 98.0, 99.5),
            candle(99.5, 100.5, 99.0, 100.0),
            candle(100.3, 101.0, 100.1, 100.8),
        ];
        assert!(bullish_fvg(&candles, 0.15).is_none());
    }

    #[test]
    fn fvg_validity_is_monotonic_in_gap_size() {
        let with_low = |low: f64| {
            vec![
                candle(99.0, 100.0, 98.0, 99.5),
                candle(99.5, 100.5, 99.0, 100.0),
                candle(100.6, 101.0, low, 100.8),
            ]
        };
        // Growing the gap keeps the zone valid; shrinking it below the floor
        // invalidates it.
        assert!(bullish_fvg(&with_low(100.2), 0.15).is_some());
        assert!(bullish_fvg(&with_low(100.4), 0.15).is_some());
        assert!(bullish_fvg(&with_low(100.6), 0.15).is_some());
        assert!(bullish_fvg(&with_low(100.1), 0.15).is_none());
        assert!(bullish_fvg(&with_low(100.05), 0.15).is_none());
    }

    #[test]
    fn bearish_fvg_measures_against_the_prior_low() {
        // low(t-2) = 100, high(t) = 99.7 -> gap 0.30%.
        let candles = vec![
            candle(101.0, 102.0, 100.0, 100.5),
            candle(100.5, 101.0, 99.8, 100.0),
            candle(99.6, 99.7, 99.0, 99.2),
        ];
        let zone = bearish_fvg(&candles, 0.15).unwrap();
        assert_eq!(zone.top, dec!(100));
        assert_eq!(zone.bottom, dec!(99.7));
        assert_eq!(zone.side, Bias::Bearish);
        let gap = zone.gap_size.unwrap();
        assert!((gap - 0.3).abs() < 1e-9, "expected 0.30%, got {gap}");
    }

    #[test]
    fn bullish_order_block_picks_the_nearest_bearish_candle() {
        // Two bearish candles inside the lookback: the later (nearer) one wins.
        let candles = vec![
            candle(100.0, 101.0, 97.0, 98.0),  // bearish, farther
            candle(98.0, 99.5, 97.5, 97.8),    // bearish, nearer
            candle(97.8, 98.5, 97.6, 98.2),    // bullish, skipped
            candle(98.2, 103.0, 98.0, 102.0),  // bullish breakout
        ];
        let zone = bullish_order_block(&candles, 3).unwrap();
        assert_eq!(zone.top, dec!(99.5));
        assert_eq!(zone.bottom, dec!(97.5));
        assert_eq!(zone.kind, ZoneKind::OrderBlock);
    }

    #[test]
    fn bullish_order_block_requires_a_bullish_breakout_candle() {
        let candles = vec![
            candle(100.0, 101.0, 97.0, 98.0),
            candle(98.0, 99.5, 97.5, 97.8),
            candle(97.8, 98.5, 97.6, 98.2),
            candle(102.0, 103.0, 98.0, 101.0), // closes above, but bearish itself
        ];
        assert!(bullish_order_block(&candles, 3).is_none());
    }

    #[test]
    fn bearish_order_block_mirrors_the_bullish_scan() {
        let candles = vec![
            candle(100.0, 101.0, 99.0, 100.5), // bullish, farther
            candle(100.5, 102.0, 100.0, 101.5), // bullish, nearer
            candle(101.5, 102.0, 95.0, 96.0),  // bearish breakdown
        ];
        let zone = bearish_order_block(&candles, 2).unwrap();
        assert_eq!(zone.top, dec!(102));
        assert_eq!(zone.bottom, dec!(100));
        assert_eq!(zone.side, Bias::Bearish);
    }

    #[test]
    fn overlap_is_inclusive_on_both_edges() {
        let zone = Zone {
            top: dec!(100.2),
            bottom: dec!(100),
            kind: ZoneKind::Fvg,
            side: Bias::Bullish,
            gap_size: Some(0.2),
        };
        // Touching the top edge from above counts.
        assert!(zone.overlaps(&candle(100.5, 101.0, 100.2, 100.9)));
        // Touching the bottom edge from below counts.
        assert!(zone.overlaps(&candle(99.5, 100.0, 99.0, 99.8)));
        // Fully above the band does not.
        assert!(!zone.overlaps(&candle(100.5, 101.0, 100.3, 100.9)));
        // Fully below the band does not.
        assert!(!zone.overlaps(&candle(99.0, 99.9, 98.5, 99.5)));
    }
}
