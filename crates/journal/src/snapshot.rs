// In crates/journal/src/snapshot.rs

use crate::error::{Error, Result};
use crate::store::KvStore;
use crate::Journal;
use core_types::{Signal, Trade, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};

const ACTIVE_SIGNALS_KEY: &str = "active_signals";
const JOURNAL_KEY: &str = "journal";

/// Versioned envelope for the active-signal map.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub schema_version: u32,
    pub signals: Vec<Signal>,
}

/// Versioned envelope for the trade journal.
#[derive(Debug, Serialize, Deserialize)]
pub struct JournalSnapshot {
    pub schema_version: u32,
    pub trades: Vec<Trade>,
}

/// A wrapper around a key-value store that reads and writes the engine's
/// persisted state through versioned snapshots.
pub struct StateRepository {
    store: Box<dyn KvStore>,
}

impl StateRepository {
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Writes the journal snapshot. The in-memory journal is untouched
    /// whether or not this succeeds.
    pub fn save_journal(&self, journal: &Journal) -> Result<()> {
        let snapshot = JournalSnapshot {
            schema_version: SCHEMA_VERSION,
            trades: journal.iter().cloned().collect(),
        };
        let raw = serde_json::to_string(&snapshot)?;
        self.store.put(JOURNAL_KEY, &raw)
    }

    /// Reads the journal snapshot back, if one was ever written.
    ///
    /// A snapshot with a different schema version is refused rather than
    /// silently reinterpreted.
    pub fn load_journal(&self, capacity: usize) -> Result<Option<Journal>> {
        let raw = match self.store.get(JOURNAL_KEY)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let snapshot: JournalSnapshot = serde_json::from_str(&raw)?;
        if snapshot.schema_version != SCHEMA_VERSION {
            return Err(Error::SchemaMismatch {
                found: snapshot.schema_version,
                expected: SCHEMA_VERSION,
            });
        }

        let mut journal = Journal::new(capacity);
        // The snapshot is newest-first; replay oldest-first so record()
        // rebuilds the same ordering.
        for trade in snapshot.trades.into_iter().rev() {
            journal.record(trade);
        }
        Ok(Some(journal))
    }

    pub fn save_active_signals(&self, signals: Vec<Signal>) -> Result<()> {
        let snapshot = SignalSnapshot {
            schema_version: SCHEMA_VERSION,
            signals,
        };
        let raw = serde_json::to_string(&snapshot)?;
        self.store.put(ACTIVE_SIGNALS_KEY, &raw)
    }

    pub fn load_active_signals(&self) -> Result<Option<Vec<Signal>>> {
        let raw = match self.store.get(ACTIVE_SIGNALS_KEY)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let snapshot: SignalSnapshot = serde_json::from_str(&raw)?;
        if snapshot.schema_version != SCHEMA_VERSION {
            return Err(Error::SchemaMismatch {
                found: snapshot.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        Ok(Some(snapshot.signals))
    }
}
