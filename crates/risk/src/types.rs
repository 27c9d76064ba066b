// In crates/risk/src/types.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The risk parameters a style hands to the bracket planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketSettings {
    /// Stop-loss distance in ATR multiples.
    pub stop_loss_atr: f64,
    /// Full take-profit target, in units of the entry-to-stop risk.
    pub take_profit_rr: f64,
    /// Partial take-profit target, in units of the entry-to-stop risk.
    pub partial_tp_rr: f64,
}

/// The protective levels planned for a signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Bracket {
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub partial_take_profit: Decimal,
    /// The reward multiple the full take-profit is worth, in R.
    pub reward_multiple: f64,
}
