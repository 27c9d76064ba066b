// In crates/core-types/src/types.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Version tag embedded in every persisted snapshot of engine state, so
/// stored signals/trades and the code that reads them can evolve independently.
pub const SCHEMA_VERSION: u32 = 1;

/// A trading pair identifier (e.g., "BTCUSDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single OHLCV candle.
///
/// Candles are immutable once produced and are always handed to the engine
/// ordered ascending by `open_time`. The engine only ever borrows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Candle open time in milliseconds since the Unix epoch.
    pub open_time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl Candle {
    /// True when the candle closed above its open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// True when the candle closed below its open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// The (symbol, interval) pair that owns exactly one open-signal slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentKey {
    pub symbol: Symbol,
    pub interval: String,
}

impl InstrumentKey {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            symbol: Symbol(symbol.into()),
            interval: interval.into(),
        }
    }
}

impl fmt::Display for InstrumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.symbol.0, self.interval)
    }
}

/// The direction of a trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

/// The kind of pullback zone that qualified a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    Fvg,
    OrderBlock,
}

/// Why an open signal was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
}

/// The outcome of a closed trade. Derived from the exit reason, never set
/// independently: a take-profit exit is a win, a stop-loss exit is a loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeOutcome {
    Win,
    Loss,
}

/// The named configuration style the engine runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingStyle {
    Day,
    Swing,
    Scalp,
}

impl FromStr for TradingStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(TradingStyle::Day),
            "swing" => Ok(TradingStyle::Swing),
            "scalp" => Ok(TradingStyle::Scalp),
            other => Err(Error::UnknownStyle(other.to_string())),
        }
    }
}

impl fmt::Display for TradingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TradingStyle::Day => "day",
            TradingStyle::Swing => "swing",
            TradingStyle::Scalp => "scalp",
        };
        write!(f, "{name}")
    }
}

/// An open trade signal.
///
/// Created by the signal engine when the emission conditions hold and the
/// key has no open signal; removed from the active set exactly when closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub key: InstrumentKey,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub partial_take_profit: Decimal,
    /// The reward multiple the full take-profit targets, in R.
    pub reward_multiple: f64,
    pub zone_kind: ZoneKind,
    pub opened_at: DateTime<Utc>,
    pub style: TradingStyle,
}

/// A closed signal, as recorded in the journal. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub key: InstrumentKey,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub exit_reason: ExitReason,
    pub outcome: TradeOutcome,
    /// P&L expressed in units of risk: `+reward_multiple` on a take-profit
    /// exit, exactly `-1.0` on a stop-loss exit.
    pub pnl_r: f64,
    pub zone_kind: ZoneKind,
    pub style: TradingStyle,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
}

impl Trade {
    /// Converts a closed signal into its journal record.
    ///
    /// Outcome and P&L are derived from the exit reason here, so a trade can
    /// never carry a WIN outcome with a stop-loss exit or vice versa.
    pub fn from_signal(
        signal: Signal,
        exit_price: Decimal,
        exit_reason: ExitReason,
        closed_at: DateTime<Utc>,
    ) -> Self {
        let (outcome, pnl_r) = match exit_reason {
            ExitReason::TakeProfit => (TradeOutcome::Win, signal.reward_multiple),
            ExitReason::StopLoss => (TradeOutcome::Loss, -1.0),
        };

        Self {
            key: signal.key,
            direction: signal.direction,
            entry_price: signal.entry_price,
            exit_price,
            exit_reason,
            outcome,
            pnl_r,
            zone_kind: signal.zone_kind,
            style: signal.style,
            opened_at: signal.opened_at,
            closed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_signal() -> Signal {
        Signal {
            key: InstrumentKey::new("BTCUSDT", "15m"),
            direction: Direction::Long,
            entry_price: dec!(100),
            stop_loss: dec!(85),
            take_profit: dec!(145),
            partial_take_profit: dec!(122.5),
            reward_multiple: 3.0,
            zone_kind: ZoneKind::Fvg,
            opened_at: Utc::now(),
            style: TradingStyle::Day,
        }
    }

    #[test]
    fn take_profit_exit_is_a_win_worth_the_reward_multiple() {
        let trade = Trade::from_signal(
            sample_signal(),
            dec!(145),
            ExitReason::TakeProfit,
            Utc::now(),
        );
        assert_eq!(trade.outcome, TradeOutcome::Win);
        assert_eq!(trade.pnl_r, 3.0);
    }

    #[test]
    fn stop_loss_exit_is_a_loss_of_exactly_one_r() {
        let trade = Trade::from_signal(sample_signal(), dec!(85), ExitReason::StopLoss, Utc::now());
        assert_eq!(trade.outcome, TradeOutcome::Loss);
        assert_eq!(trade.pnl_r, -1.0);
    }

    #[test]
    fn style_names_round_trip() {
        for style in [TradingStyle::Day, TradingStyle::Swing, TradingStyle::Scalp] {
            assert_eq!(style.to_string().parse::<TradingStyle>().ok(), Some(style));
        }
        assert!("turbo".parse::<TradingStyle>().is_err());
    }

    #[test]
    fn instrument_key_renders_symbol_and_interval() {
        assert_eq!(InstrumentKey::new("ETHUSDT", "1h").to_string(), "ETHUSDT_1h");
    }
}
