// Lifecycle and persistence tests: signals restored from the store are
// tracked to stop or target, recorded in the journal, and survive an engine
// restart.

use chrono::Utc;
use core_types::{
    Candle, Direction, ExitReason, InstrumentKey, Signal, TradeOutcome, TradingStyle, ZoneKind,
};
use engine::{EngineConfig, SignalEngine};
use journal::{JournalFilter, KvStore, MemoryStore, StateRepository};
use risk::atr_bracket::AtrBracketPlanner;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn key() -> InstrumentKey {
    InstrumentKey::new("BTCUSDT", "15m")
}

fn open_long(stop_loss: Decimal, take_profit: Decimal) -> Signal {
    Signal {
        key: key(),
        direction: Direction::Long,
        entry_price: dec!(100),
        stop_loss,
        take_profit,
        partial_take_profit: dec!(115),
        reward_multiple: 3.0,
        zone_kind: ZoneKind::Fvg,
        opened_at: Utc::now(),
        style: TradingStyle::Day,
    }
}

/// A store wrapper shared between the seeding repository and the engine.
#[derive(Clone)]
struct SharedStore(Arc<MemoryStore>);

impl KvStore for SharedStore {
    fn get(&self, key: &str) -> journal::Result<Option<String>> {
        self.0.get(key)
    }
    fn put(&self, key: &str, value: &str) -> journal::Result<()> {
        self.0.put(key, value)
    }
    fn remove(&self, key: &str) -> journal::Result<()> {
        self.0.remove(key)
    }
}

fn engine_with_seeded_signal(signal: Signal) -> (SignalEngine, SharedStore) {
    let store = SharedStore(Arc::new(MemoryStore::new()));
    let seeder = StateRepository::new(Box::new(store.clone()));
    seeder.save_active_signals(vec![signal]).unwrap();

    let engine = SignalEngine::new(
        EngineConfig::default(),
        Box::new(AtrBracketPlanner::new()),
        Box::new(store.clone()),
    );
    (engine, store)
}

fn short_flat_window() -> Vec<Candle> {
    // Far below any profile's requirement, so detection is skipped and the
    // lifecycle check is all that runs.
    (0..5)
        .map(|i| Candle {
            open_time: i * 900_000,
            open: dec!(100),
            high: dec!(101),
            low: dec!(99),
            close: dec!(100),
            volume: dec!(1),
        })
        .collect()
}

#[test]
fn a_restored_long_rides_to_its_target() {
    let (mut engine, _store) = engine_with_seeded_signal(open_long(dec!(90), dec!(130)));
    assert_eq!(engine.open_signal_count(), 1);

    // Price wanders without touching a level: nothing closes.
    let quiet = engine.evaluate(&key(), &short_flat_window(), dec!(95));
    assert!(quiet.closed_trade.is_none());
    assert!(quiet.active_signal.is_some());
    // The short window also means no detection output.
    assert!(quiet.trend.is_none());
    assert!(quiet.rsi.is_none());

    // Price clears the target: the trade closes as a win at the level.
    let hit = engine.evaluate(&key(), &short_flat_window(), dec!(131));
    let trade = hit.closed_trade.expect("expected a closed trade");
    assert_eq!(trade.outcome, TradeOutcome::Win);
    assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
    assert_eq!(trade.exit_price, dec!(130));
    assert_eq!(trade.pnl_r, 3.0);
    assert!(hit.active_signal.is_none());
    assert_eq!(engine.open_signal_count(), 0);
}

#[test]
fn a_restored_long_stopped_out_loses_exactly_one_r() {
    let (mut engine, _store) = engine_with_seeded_signal(open_long(dec!(90), dec!(130)));

    let hit = engine.evaluate(&key(), &short_flat_window(), dec!(89));
    let trade = hit.closed_trade.expect("expected a closed trade");
    assert_eq!(trade.outcome, TradeOutcome::Loss);
    assert_eq!(trade.exit_reason, ExitReason::StopLoss);
    assert_eq!(trade.exit_price, dec!(90));
    assert_eq!(trade.pnl_r, -1.0);
}

#[test]
fn a_short_signal_mirrors_the_exit_tests() {
    let mut signal = open_long(dec!(110), dec!(70));
    signal.direction = Direction::Short;
    let (mut engine, _store) = engine_with_seeded_signal(signal);

    // Above the stop: loss.
    let hit = engine.evaluate(&key(), &short_flat_window(), dec!(111));
    let trade = hit.closed_trade.expect("expected a closed trade");
    assert_eq!(trade.exit_reason, ExitReason::StopLoss);
    assert_eq!(trade.exit_price, dec!(110));
}

#[test]
fn the_take_profit_wins_a_crossed_bracket() {
    // A crossed bracket (stop above target on a short) can satisfy both exit
    // tests with one price; the take-profit check runs first and wins. The
    // ordering is policy, not accident.
    let mut signal = open_long(dec!(90), dec!(130));
    signal.direction = Direction::Short;
    let (mut engine, _store) = engine_with_seeded_signal(signal);

    let hit = engine.evaluate(&key(), &short_flat_window(), dec!(95));
    let trade = hit.closed_trade.expect("expected a closed trade");
    assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
    assert_eq!(trade.outcome, TradeOutcome::Win);
}

#[test]
fn closed_trades_land_in_the_journal_and_survive_a_restart() {
    let (mut engine, store) = engine_with_seeded_signal(open_long(dec!(90), dec!(130)));

    engine.evaluate(&key(), &short_flat_window(), dec!(131));
    assert_eq!(engine.stats().total, 1);
    assert_eq!(engine.stats().wins, 1);
    assert_eq!(engine.stats().win_rate, 100);

    // A fresh engine over the same store sees the recorded trade and a freed
    // key.
    let restarted = SignalEngine::new(
        EngineConfig::default(),
        Box::new(AtrBracketPlanner::new()),
        Box::new(store),
    );
    assert_eq!(restarted.stats().total, 1);
    assert_eq!(restarted.open_signal_count(), 0);
    assert_eq!(restarted.history(JournalFilter::Wins).len(), 1);
}

#[test]
fn clearing_the_history_leaves_open_signals_alone() {
    let (mut engine, _store) = engine_with_seeded_signal(open_long(dec!(90), dec!(130)));

    engine.clear_history();
    assert_eq!(engine.stats().total, 0);
    assert_eq!(engine.open_signal_count(), 1);
}

#[test]
fn an_empty_window_still_tracks_the_open_signal() {
    let (mut engine, _store) = engine_with_seeded_signal(open_long(dec!(90), dec!(130)));

    // No candles at all: detection is impossible, the lifecycle check is not.
    let hit = engine.evaluate(&key(), &[], dec!(131));
    assert!(hit.closed_trade.is_some());
}
