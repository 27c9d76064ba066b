// In crates/strategy/src/structure.rs

use num_traits::cast::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of the market a zone or structure break favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendBias {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStrength {
    Strong,
    Moderate,
}

/// The trend filter's verdict for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendReading {
    pub bias: TrendBias,
    pub strength: TrendStrength,
}

/// How decisively price closed beyond the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakMode {
    /// Break of structure: clearance beyond the pivot by more than the
    /// configured threshold.
    Bos,
    /// Change of character: a plain clearance with no threshold buffer.
    Choch,
}

/// Evidence that price closed beyond the last opposite pivot. Transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureBreak {
    pub side: Bias,
    pub mode: BreakMode,
}

/// Which break modes satisfy the emission gate.
///
/// `BosOrChoch` is the canonical rule; `BosOnly` keeps the stricter
/// deprecated variant reachable through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureRule {
    #[default]
    BosOrChoch,
    BosOnly,
}

impl StructureRule {
    pub fn admits(&self, brk: &StructureBreak) -> bool {
        match self {
            StructureRule::BosOrChoch => true,
            StructureRule::BosOnly => brk.mode == BreakMode::Bos,
        }
    }
}

/// Classifies the trend from the close/MA relation and the RSI midline, with
/// the 60/40 bands marking a strong reading.
pub fn classify_trend(close: Decimal, trend_ma: Decimal, rsi: f64) -> TrendReading {
    if close > trend_ma && rsi > 50.0 {
        TrendReading {
            bias: TrendBias::Bullish,
            strength: if rsi > 60.0 {
                TrendStrength::Strong
            } else {
                TrendStrength::Moderate
            },
        }
    } else if close < trend_ma && rsi < 50.0 {
        TrendReading {
            bias: TrendBias::Bearish,
            strength: if rsi < 40.0 {
                TrendStrength::Strong
            } else {
                TrendStrength::Moderate
            },
        }
    } else {
        TrendReading {
            bias: TrendBias::Neutral,
            strength: TrendStrength::Moderate,
        }
    }
}

/// Tests the close against the last swing high.
///
/// BOS needs `close > pivot * (1 + threshold/100)`; CHoCH needs only
/// `close > pivot`. BOS is reported when both hold.
pub fn bullish_break(close: Decimal, pivot_high: Decimal, threshold_pct: f64) -> Option<StructureBreak> {
    let threshold = Decimal::from_f64(threshold_pct).unwrap_or_default();
    let buffer = Decimal::ONE + threshold / Decimal::ONE_HUNDRED;

    if close > pivot_high * buffer {
        Some(StructureBreak {
            side: Bias::Bullish,
            mode: BreakMode::Bos,
        })
    } else if close > pivot_high {
        Some(StructureBreak {
            side: Bias::Bullish,
            mode: BreakMode::Choch,
        })
    } else {
        None
    }
}

/// Mirror of [`bullish_break`] against the last swing low.
pub fn bearish_break(close: Decimal, pivot_low: Decimal, threshold_pct: f64) -> Option<StructureBreak> {
    let threshold = Decimal::from_f64(threshold_pct).unwrap_or_default();
    let buffer = Decimal::ONE - threshold / Decimal::ONE_HUNDRED;

    if close < pivot_low * buffer {
        Some(StructureBreak {
            side: Bias::Bearish,
            mode: BreakMode::Bos,
        })
    } else if close < pivot_low {
        Some(StructureBreak {
            side: Bias::Bearish,
            mode: BreakMode::Choch,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn trend_quadrants() {
        let reading = classify_trend(dec!(105), dec!(100), 55.0);
        assert_eq!(reading.bias, TrendBias::Bullish);
        assert_eq!(reading.strength, TrendStrength::Moderate);

        let reading = classify_trend(dec!(105), dec!(100), 65.0);
        assert_eq!(reading.bias, TrendBias::Bullish);
        assert_eq!(reading.strength, TrendStrength::Strong);

        let reading = classify_trend(dec!(95), dec!(100), 45.0);
        assert_eq!(reading.bias, TrendBias::Bearish);
        assert_eq!(reading.strength, TrendStrength::Moderate);

        let reading = classify_trend(dec!(95), dec!(100), 35.0);
        assert_eq!(reading.bias, TrendBias::Bearish);
        assert_eq!(reading.strength, TrendStrength::Strong);
    }

    #[test]
    fn disagreeing_filters_are_neutral() {
        // Above the MA but weak RSI, and vice versa.
        assert_eq!(classify_trend(dec!(105), dec!(100), 45.0).bias, TrendBias::Neutral);
        assert_eq!(classify_trend(dec!(95), dec!(100), 55.0).bias, TrendBias::Neutral);
    }

    #[test]
    fn a_thresholded_clearance_is_a_bos() {
        // Pivot 100, threshold 0.1% -> BOS needs a close above 100.1.
        let brk = bullish_break(dec!(100.2), dec!(100), 0.1).unwrap();
        assert_eq!(brk.mode, BreakMode::Bos);
        assert_eq!(brk.side, Bias::Bullish);
    }

    #[test]
    fn a_plain_clearance_is_only_a_choch() {
        let brk = bullish_break(dec!(100.05), dec!(100), 0.1).unwrap();
        assert_eq!(brk.mode, BreakMode::Choch);
        assert!(bullish_break(dec!(99.9), dec!(100), 0.1).is_none());
    }

    #[test]
    fn bearish_break_mirrors_the_thresholds() {
        let brk = bearish_break(dec!(99.8), dec!(100), 0.1).unwrap();
        assert_eq!(brk.mode, BreakMode::Bos);
        assert_eq!(brk.side, Bias::Bearish);

        let brk = bearish_break(dec!(99.95), dec!(100), 0.1).unwrap();
        assert_eq!(brk.mode, BreakMode::Choch);
        assert!(bearish_break(dec!(100.05), dec!(100), 0.1).is_none());
    }

    #[test]
    fn the_bos_only_rule_rejects_choch_breaks() {
        let choch = StructureBreak {
            side: Bias::Bullish,
            mode: BreakMode::Choch,
        };
        let bos = StructureBreak {
            side: Bias::Bullish,
            mode: BreakMode::Bos,
        };
        assert!(StructureRule::BosOrChoch.admits(&choch));
        assert!(StructureRule::BosOrChoch.admits(&bos));
        assert!(!StructureRule::BosOnly.admits(&choch));
        assert!(StructureRule::BosOnly.admits(&bos));
    }
}
