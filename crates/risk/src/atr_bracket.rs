// In crates/risk/src/atr_bracket.rs

use crate::types::{Bracket, BracketSettings};
use crate::{Error, Result, RiskModel}; // Import our own trait and errors
use core_types::Direction;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;

/// A bracket planner that anchors the stop to current volatility.
///
/// The stop sits `stop_loss_atr` ATRs away from the entry; both take-profit
/// levels are then expressed as multiples of that entry-to-stop distance, so
/// every trade risks exactly one R by construction.
#[derive(Debug, Default)]
pub struct AtrBracketPlanner;

impl AtrBracketPlanner {
    pub fn new() -> Self {
        Self
    }
}

impl RiskModel for AtrBracketPlanner {
    fn name(&self) -> &'static str {
        "AtrBracketPlanner"
    }

    fn plan(
        &self,
        direction: Direction,
        entry: Decimal,
        atr: Decimal,
        settings: &BracketSettings,
    ) -> Result<Bracket> {
        // --- Parameter validation ---

        if atr <= Decimal::ZERO {
            return Err(Error::InvalidParameters(format!(
                "ATR must be positive, got {atr}"
            )));
        }
        if settings.stop_loss_atr <= 0.0
            || settings.take_profit_rr <= 0.0
            || settings.partial_tp_rr <= 0.0
        {
            return Err(Error::InvalidParameters(
                "stop/target multiples must be positive".to_string(),
            ));
        }

        let stop_multiple = Decimal::from_f64(settings.stop_loss_atr)
            .ok_or_else(|| Error::InvalidParameters("stop_loss_atr is not finite".to_string()))?;
        let target_multiple = Decimal::from_f64(settings.take_profit_rr)
            .ok_or_else(|| Error::InvalidParameters("take_profit_rr is not finite".to_string()))?;
        let partial_multiple = Decimal::from_f64(settings.partial_tp_rr)
            .ok_or_else(|| Error::InvalidParameters("partial_tp_rr is not finite".to_string()))?;

        // --- Level calculation ---

        let stop_distance = atr * stop_multiple;

        let bracket = match direction {
            Direction::Long => {
                let stop_loss = entry - stop_distance;
                let risk_amount = entry - stop_loss;
                Bracket {
                    stop_loss,
                    take_profit: entry + risk_amount * target_multiple,
                    partial_take_profit: entry + risk_amount * partial_multiple,
                    reward_multiple: settings.take_profit_rr,
                }
            }
            Direction::Short => {
                let stop_loss = entry + stop_distance;
                let risk_amount = stop_loss - entry;
                Bracket {
                    stop_loss,
                    take_profit: entry - risk_amount * target_multiple,
                    partial_take_profit: entry - risk_amount * partial_multiple,
                    reward_multiple: settings.take_profit_rr,
                }
            }
        };

        Ok(bracket)
    }
}
