// In crates/journal/src/lib.rs

use core_types::{ExitReason, Trade, TradeOutcome};
use std::collections::VecDeque;

pub mod error;
pub mod snapshot;
pub mod store;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use snapshot::StateRepository;
pub use store::{FileStore, KvStore, MemoryStore};
pub use types::{JournalFilter, TradeStats};

/// The default number of trades the journal retains.
pub const DEFAULT_CAPACITY: usize = 100;

/// A bounded, newest-first record of closed trades.
///
/// New trades are pushed to the front; once the ring is full the oldest
/// entry falls off the back. Trades are immutable once recorded.
#[derive(Debug, Clone)]
pub struct Journal {
    trades: VecDeque<Trade>,
    capacity: usize,
}

impl Journal {
    /// Creates an empty journal holding at most `capacity` trades.
    pub fn new(capacity: usize) -> Self {
        Self {
            trades: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    /// Records a closed trade as the newest entry, dropping the oldest one
    /// if the ring is full.
    pub fn record(&mut self, trade: Trade) {
        self.trades.push_front(trade);
        self.trades.truncate(self.capacity);
    }

    /// Scans the journal and recomputes the aggregate statistics.
    pub fn stats(&self) -> TradeStats {
        let total = self.trades.len();
        let wins = self
            .trades
            .iter()
            .filter(|t| t.outcome == TradeOutcome::Win)
            .count();
        let losses = total - wins;
        let win_rate = if total > 0 {
            ((wins as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        let tp_hits = self
            .trades
            .iter()
            .filter(|t| t.exit_reason == ExitReason::TakeProfit)
            .count();
        let sl_hits = self
            .trades
            .iter()
            .filter(|t| t.exit_reason == ExitReason::StopLoss)
            .count();

        TradeStats {
            total,
            wins,
            losses,
            win_rate,
            tp_hits,
            sl_hits,
        }
    }

    /// A filtered, newest-first view of the journal.
    pub fn filter(&self, filter: JournalFilter) -> Vec<&Trade> {
        self.trades
            .iter()
            .filter(|t| match filter {
                JournalFilter::All => true,
                JournalFilter::Wins => t.outcome == TradeOutcome::Win,
                JournalFilter::Losses => t.outcome == TradeOutcome::Loss,
                JournalFilter::TakeProfits => t.exit_reason == ExitReason::TakeProfit,
                JournalFilter::StopLosses => t.exit_reason == ExitReason::StopLoss,
            })
            .collect()
    }

    /// Iterates newest-first.
    pub fn iter(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every recorded trade.
    pub fn clear(&mut self) {
        self.trades.clear();
    }
}
