// In app/src/main.rs

use anyhow::Result;
use app_config::Settings;
use clap::{Parser, Subcommand};
use core_types::{Candle, InstrumentKey, TradingStyle};
use engine::task::ReplayTask;
use engine::{EngineConfig, SignalEngine};
use futures::future;
use journal::{FileStore, Journal, JournalFilter, KvStore, MemoryStore, StateRepository};
use num_traits::FromPrimitive;
use risk::atr_bracket::AtrBracketPlanner;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strategy::StyleProfile;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "A market-structure trade signal engine.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replays the configured candle files through the signal engine.
    Run {
        /// Override the configured trading style ("day", "swing" or "scalp").
        #[arg(short, long)]
        style: Option<String>,
    },

    /// Prints the persisted trade journal and its statistics.
    Stats,

    /// Writes a synthetic random-walk candle file for trying the engine out.
    Seed {
        /// Where to write the candle file.
        #[arg(short, long)]
        out: PathBuf,

        /// How many candles to generate.
        #[arg(short, long, default_value_t = 500)]
        candles: usize,

        /// Starting price for the walk.
        #[arg(long, default_value_t = 100.0)]
        start_price: f64,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // The configured log level is the default; RUST_LOG still wins when set.
    let log_level = app_config::load_settings()
        .map(|s| s.app.log_level)
        .unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Parse command-line arguments.
    let cli = Cli::parse();

    tracing::info!("Starting Vantage application");

    match cli.command {
        Commands::Run { style } => {
            run_replay(style).await?;
        }
        Commands::Stats => {
            show_stats()?;
        }
        Commands::Seed {
            out,
            candles,
            start_price,
        } => {
            seed_candles(&out, candles, start_price)?;
        }
    }

    tracing::info!("Vantage application has finished successfully.");

    Ok(())
}

// --- "Run" Subcommand Logic ---

/// The primary logic for the `run` command: build the engine, spawn one
/// replay task per configured instrument, then print the final journal.
async fn run_replay(style_override: Option<String>) -> Result<()> {
    // --- 1. Initialization ---
    let settings = app_config::load_settings()?;
    tracing::info!("Application settings loaded successfully.");

    let watchlist = app_config::load_watchlist()?;

    // --- 2. Component Instantiation ---
    let engine = Arc::new(Mutex::new(build_engine(&settings, style_override)?));

    // --- 3. Launch a Replay Task per Instrument ---
    let mut task_handles = vec![];

    for instrument in &watchlist.instruments {
        if !instrument.enabled {
            tracing::warn!(symbol = %instrument.symbol, "Skipping disabled instrument.");
            continue;
        }

        let candles = load_candles(&instrument.candle_file)?;
        let key = InstrumentKey::new(instrument.symbol.clone(), instrument.interval.clone());
        tracing::info!(key = %key, candles = candles.len(), "Setting up replay task.");

        let task = ReplayTask::new(key, candles, engine.clone());
        task_handles.push(tokio::spawn(task.run()));
    }

    if task_handles.is_empty() {
        anyhow::bail!("No replay tasks were started. Check config/instruments.toml.");
    }

    tracing::info!(count = task_handles.len(), "All replay tasks have been spawned.");

    // Wait for every replay to finish; instruments are independent, so one
    // failing does not stop the others.
    let results = future::join_all(task_handles).await;
    for result in results {
        match result {
            Ok(Ok(summary)) => tracing::info!(
                key = %summary.key,
                ticks = summary.ticks,
                signals = summary.signals_emitted,
                trades = summary.trades_closed,
                "Replay finished."
            ),
            Ok(Err(e)) => tracing::error!(error = %e, "Replay task failed."),
            Err(e) => tracing::error!(error = %e, "Replay task panicked."),
        }
    }

    // --- 4. Final Report ---
    let engine = engine.lock().await;
    if let Err(e) = engine.persist() {
        tracing::warn!(error = %e, "Failed to write the final state snapshot.");
    }
    print_report(&engine);

    Ok(())
}

/// Builds the engine from the loaded settings, honoring per-style overrides
/// and the optional CLI style override.
fn build_engine(settings: &Settings, style_override: Option<String>) -> Result<SignalEngine> {
    let store: Box<dyn KvStore> = match &settings.store.path {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Using the JSON file store.");
            Box::new(FileStore::new(dir))
        }
        None => {
            tracing::info!("No store path configured; state is in-memory only.");
            Box::new(MemoryStore::new())
        }
    };

    let mut profiles: HashMap<TradingStyle, StyleProfile> = HashMap::new();
    if let Some(day) = settings.styles.day.clone() {
        profiles.insert(TradingStyle::Day, day);
    }
    if let Some(swing) = settings.styles.swing.clone() {
        profiles.insert(TradingStyle::Swing, swing);
    }
    if let Some(scalp) = settings.styles.scalp.clone() {
        profiles.insert(TradingStyle::Scalp, scalp);
    }

    let style_name = style_override.unwrap_or_else(|| settings.engine.style.clone());
    let style: TradingStyle = style_name.parse()?;

    let config = EngineConfig {
        style,
        journal_capacity: settings.engine.journal_capacity,
        structure_rule: settings.engine.structure_rule,
        profiles,
    };

    Ok(SignalEngine::new(
        config,
        Box::new(AtrBracketPlanner::new()),
        store,
    ))
}

/// Reads a JSON candle file (an array of candles) for one instrument.
fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read candle file {}: {}", path.display(), e))?;
    let candles: Vec<Candle> = serde_json::from_str(&raw)?;
    Ok(candles)
}

/// Helper function to print the final journal summary.
fn print_report(engine: &SignalEngine) {
    let stats = engine.stats();

    println!("\n--- Replay Complete ---");
    println!("-----------------------");
    println!(
        "Trades: {} | Wins: {} | Losses: {} | Win rate: {}%",
        stats.total, stats.wins, stats.losses, stats.win_rate
    );
    println!("TP hits: {} | SL hits: {}", stats.tp_hits, stats.sl_hits);

    let history = engine.history(JournalFilter::All);
    if !history.is_empty() {
        println!("\nMost recent trades:");
        for trade in history.iter().take(10) {
            println!(
                "  {} {} {:?} entry {} exit {} ({:?}) {:+.1}R",
                trade.closed_at.format("%Y-%m-%d %H:%M"),
                trade.key,
                trade.direction,
                trade.entry_price,
                trade.exit_price,
                trade.exit_reason,
                trade.pnl_r
            );
        }
    }

    if engine.open_signal_count() > 0 {
        println!("\nStill open: {} signal(s)", engine.open_signal_count());
    }
    println!("-----------------------");
}

// --- "Stats" Subcommand Logic ---

/// Loads the persisted journal without running a replay and prints it.
fn show_stats() -> Result<()> {
    let settings = app_config::load_settings()?;

    let dir = settings.store.path.ok_or_else(|| {
        anyhow::anyhow!("The stats command needs a persistent store; set `store.path` in config/base.toml.")
    })?;

    let repository = StateRepository::new(Box::new(FileStore::new(dir)));
    let journal = repository
        .load_journal(settings.engine.journal_capacity)?
        .unwrap_or_else(|| Journal::new(settings.engine.journal_capacity));

    let stats = journal.stats();
    println!("--- Trade Journal ---");
    println!(
        "Trades: {} | Wins: {} | Losses: {} | Win rate: {}%",
        stats.total, stats.wins, stats.losses, stats.win_rate
    );
    println!("TP hits: {} | SL hits: {}", stats.tp_hits, stats.sl_hits);

    for trade in journal.iter().take(20) {
        println!(
            "  {} {} {:?} entry {} exit {} ({:?}) {:+.1}R",
            trade.closed_at.format("%Y-%m-%d %H:%M"),
            trade.key,
            trade.direction,
            trade.entry_price,
            trade.exit_price,
            trade.exit_reason,
            trade.pnl_r
        );
    }

    Ok(())
}

// --- "Seed" Subcommand Logic ---

/// Generates a random-walk candle series and writes it as JSON, so `run` has
/// something to replay without any exchange connectivity.
fn seed_candles(out: &Path, count: usize, start_price: f64) -> Result<()> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let mut candles = Vec::with_capacity(count);
    let mut close = start_price.max(0.01);

    // A fixed base time keeps regenerated files comparable between runs.
    let base_time = 1_700_000_000_000i64;

    for i in 0..count {
        let open = close;
        let drift: f64 = rng.gen_range(-1.2..1.25);
        close = (open * (1.0 + drift / 100.0)).max(0.01);

        let body_high = open.max(close);
        let body_low = open.min(close);
        let high = body_high * (1.0 + rng.gen_range(0.0..0.4) / 100.0);
        let low = body_low * (1.0 - rng.gen_range(0.0..0.4) / 100.0);
        let volume = rng.gen_range(50.0..500.0);

        candles.push(Candle {
            open_time: base_time + (i as i64) * 900_000,
            open: to_decimal(open),
            high: to_decimal(high),
            low: to_decimal(low),
            close: to_decimal(close),
            volume: to_decimal(volume),
        });
    }

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_string_pretty(&candles)?)?;

    println!("Wrote {} candles to {}", count, out.display());
    Ok(())
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default().round_dp(4)
}
