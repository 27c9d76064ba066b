// In crates/journal/src/types.rs

use serde::{Deserialize, Serialize};

/// Aggregate statistics over the journal's current contents.
///
/// Recomputed on demand by scanning the journal; never maintained
/// incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TradeStats {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    /// Win percentage rounded to the nearest whole percent; 0 when empty.
    pub win_rate: u32,
    pub tp_hits: usize,
    pub sl_hits: usize,
}

/// Views over the journal, matching what the presentation layer can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalFilter {
    All,
    Wins,
    Losses,
    TakeProfits,
    StopLosses,
}
