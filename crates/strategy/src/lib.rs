// In crates/strategy/src/lib.rs

use core_types::Candle;
use rust_decimal::Decimal;

pub mod indicators;
pub mod pivot;
pub mod profile;
pub mod structure;
pub mod zones;

pub use pivot::{PivotKind, PivotPoint};
pub use profile::StyleProfile;
pub use structure::{
    Bias, BreakMode, StructureBreak, StructureRule, TrendBias, TrendReading, TrendStrength,
};
pub use zones::Zone;

/// Everything the detection layer can say about one candle window.
///
/// All fields are pure functions of the window: nothing here carries identity
/// or lifecycle across ticks. A `None` means the input was too short for that
/// detector, never an error.
#[derive(Debug, Clone, Default)]
pub struct MarketView {
    pub trend: Option<TrendReading>,
    pub rsi: Option<f64>,
    pub atr: Option<Decimal>,
    pub swing_high: Option<PivotPoint>,
    pub swing_low: Option<PivotPoint>,
    pub bullish_break: Option<StructureBreak>,
    pub bearish_break: Option<StructureBreak>,
    /// The bullish zone the current candle is pulling back into, if any.
    /// A fair-value gap wins over an order block when both qualify.
    pub long_zone: Option<Zone>,
    /// Mirror of `long_zone` for the short side.
    pub short_zone: Option<Zone>,
}

/// Runs the full detection pass for one tick over the given candle window.
///
/// The caller is expected to gate on `profile.required_candles()` first; with
/// a shorter window every field simply comes back `None`.
pub fn analyze(candles: &[Candle], profile: &StyleProfile) -> MarketView {
    let current = match candles.last() {
        Some(candle) => candle,
        None => return MarketView::default(),
    };

    let trend_ma = indicators::sma(candles, profile.trend_ma_period);
    let rsi = indicators::rsi(candles, profile.rsi_period);
    let atr = indicators::atr(candles, profile.atr_period);

    let trend = match (trend_ma, rsi) {
        (Some(ma), Some(rsi)) => Some(structure::classify_trend(current.close, ma, rsi)),
        _ => None,
    };

    let swing_high = pivot::pivot_high(candles, profile.swing_length);
    let swing_low = pivot::pivot_low(candles, profile.swing_length);

    let bullish_break = swing_high
        .as_ref()
        .and_then(|p| structure::bullish_break(current.close, p.price, profile.bos_threshold));
    let bearish_break = swing_low
        .as_ref()
        .and_then(|p| structure::bearish_break(current.close, p.price, profile.bos_threshold));

    let long_zone = zones::bullish_fvg(candles, profile.fvg_min_size)
        .filter(|z| z.overlaps(current))
        .or_else(|| {
            zones::bullish_order_block(candles, profile.ob_lookback).filter(|z| z.overlaps(current))
        });
    let short_zone = zones::bearish_fvg(candles, profile.fvg_min_size)
        .filter(|z| z.overlaps(current))
        .or_else(|| {
            zones::bearish_order_block(candles, profile.ob_lookback).filter(|z| z.overlaps(current))
        });

    MarketView {
        trend,
        rsi,
        atr,
        swing_high,
        swing_low,
        bullish_break,
        bearish_break,
        long_zone,
        short_zone,
    }
}
