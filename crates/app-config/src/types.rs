// In crates/app-config/src/types.rs

use serde::Deserialize;
use std::path::PathBuf;

use strategy::{StructureRule, StyleProfile};

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the signal engine itself.
    pub engine: EngineSettings,
    /// Per-style profile overrides; a style without an override uses its
    /// built-in bundle.
    #[serde(default)]
    pub styles: StyleOverrides,
    /// Where engine state is persisted between runs.
    #[serde(default)]
    pub store: StoreSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EngineSettings {
    /// The trading style the engine starts under ("day", "swing" or "scalp").
    #[serde(default = "default_style")]
    pub style: String,
    /// How many closed trades the journal retains.
    #[serde(default = "default_journal_capacity")]
    pub journal_capacity: usize,
    /// Whether a CHoCH satisfies the structure gate, or only a full BOS.
    #[serde(default)]
    pub structure_rule: StructureRule,
}

// Define the container for all per-style profile overrides
#[derive(Deserialize, Debug, Default, Clone)]
pub struct StyleOverrides {
    // Each style has its own optional settings block
    pub day: Option<StyleProfile>,
    pub swing: Option<StyleProfile>,
    pub scalp: Option<StyleProfile>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct StoreSettings {
    /// Directory for the JSON state store. When unset the engine keeps its
    /// state in memory only.
    pub path: Option<PathBuf>,
}

// --- Structs for instruments.toml Configuration ---

/// The top-level watch list for a replay run.
#[derive(Deserialize, Debug, Clone)]
pub struct Watchlist {
    pub instruments: Vec<InstrumentConfig>,
}

/// Configuration for a single watched instrument.
#[derive(Deserialize, Debug, Clone)]
pub struct InstrumentConfig {
    pub symbol: String,
    pub interval: String,
    /// JSON file holding the candle series to replay for this instrument.
    pub candle_file: PathBuf,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Helper functions for serde defaults
fn default_style() -> String {
    "day".to_string()
}
fn default_journal_capacity() -> usize {
    100
}
fn default_enabled() -> bool {
    true
}
