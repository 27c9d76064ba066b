// In crates/risk/src/lib.rs

use core_types::Direction;
use rust_decimal::Decimal;

pub mod atr_bracket;
pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::{Bracket, BracketSettings};

/// The universal interface for a bracket-planning module.
///
/// A `RiskModel` turns an approved entry (direction + entry price + current
/// volatility) into the protective levels the signal will live under: the
/// stop-loss, the full take-profit, and the partial take-profit.
pub trait RiskModel: Send + Sync {
    /// The name of the risk model.
    fn name(&self) -> &'static str;

    /// Plans the bracket for a prospective signal.
    ///
    /// # Arguments
    ///
    /// * `direction`: The side the signal wants to trade.
    /// * `entry`: The entry price (the emitting candle's close).
    /// * `atr`: The current average true range.
    /// * `settings`: The active style's risk parameters.
    ///
    /// # Returns
    ///
    /// * `Ok(Bracket)`: The stop/target levels, expressed so that the full
    ///   target is worth `take_profit_rr` units of the entry-to-stop risk.
    /// * `Err(Error::InvalidParameters)`: If the ATR or any multiple is not
    ///   strictly positive.
    fn plan(
        &self,
        direction: Direction,
        entry: Decimal,
        atr: Decimal,
        settings: &BracketSettings,
    ) -> Result<Bracket>;
}
