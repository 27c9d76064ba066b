// In crates/strategy/src/profile.rs

use core_types::TradingStyle;
use serde::{Deserialize, Serialize};

/// The fixed parameter bundle behind one trading style.
///
/// Percentages (`bos_threshold`, `fvg_min_size`) are expressed in percent,
/// not fractions: `0.15` means 0.15%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Candles on each side of a swing pivot's center bar.
    pub swing_length: usize,
    /// Extra clearance (in %) a close needs beyond a pivot for a BOS.
    pub bos_threshold: f64,
    /// Minimum gap size (in %) for a fair-value gap to count.
    pub fvg_min_size: f64,
    /// How many candles back the order-block scan walks.
    pub ob_lookback: usize,
    /// Stop-loss distance in ATR multiples.
    pub stop_loss_atr: f64,
    /// Full take-profit target, in R.
    pub take_profit_rr: f64,
    /// Partial take-profit target, in R.
    pub partial_tp_rr: f64,
    pub trend_ma_period: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
}

impl StyleProfile {
    /// The built-in bundle for a style.
    pub fn for_style(style: TradingStyle) -> Self {
        match style {
            TradingStyle::Day => Self::day(),
            TradingStyle::Swing => Self::swing(),
            TradingStyle::Scalp => Self::scalp(),
        }
    }

    pub fn day() -> Self {
        Self {
            swing_length: 5,
            bos_threshold: 0.1,
            fvg_min_size: 0.15,
            ob_lookback: 5,
            stop_loss_atr: 1.5,
            take_profit_rr: 3.0,
            partial_tp_rr: 1.5,
            trend_ma_period: 50,
            rsi_period: 14,
            atr_period: 14,
        }
    }

    pub fn swing() -> Self {
        Self {
            swing_length: 7,
            bos_threshold: 0.15,
            fvg_min_size: 0.20,
            ob_lookback: 7,
            stop_loss_atr: 2.0,
            take_profit_rr: 5.0,
            partial_tp_rr: 2.5,
            trend_ma_period: 100,
            rsi_period: 14,
            atr_period: 14,
        }
    }

    pub fn scalp() -> Self {
        Self {
            swing_length: 3,
            bos_threshold: 0.05,
            fvg_min_size: 0.10,
            ob_lookback: 3,
            stop_loss_atr: 1.0,
            take_profit_rr: 2.0,
            partial_tp_rr: 1.0,
            trend_ma_period: 20,
            rsi_period: 14,
            atr_period: 14,
        }
    }

    /// The longest candle window any detector under this profile needs.
    /// Below this the engine skips detection for the tick entirely.
    pub fn required_candles(&self) -> usize {
        (2 * self.swing_length + 1)
            .max(self.trend_ma_period + 1)
            .max(self.rsi_period + 1)
            .max(self.atr_period + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_profile_needs_the_trend_ma_window() {
        // max(11, 51, 15, 15)
        assert_eq!(StyleProfile::day().required_candles(), 51);
    }

    #[test]
    fn scalp_profile_is_bounded_by_the_trend_ma_too() {
        // max(7, 21, 15, 15)
        assert_eq!(StyleProfile::scalp().required_candles(), 21);
    }

    #[test]
    fn each_style_resolves_to_its_own_bundle() {
        assert_eq!(StyleProfile::for_style(TradingStyle::Day), StyleProfile::day());
        assert_eq!(
            StyleProfile::for_style(TradingStyle::Swing),
            StyleProfile::swing()
        );
        assert_eq!(
            StyleProfile::for_style(TradingStyle::Scalp),
            StyleProfile::scalp()
        );
    }
}
