// In crates/engine/src/lib.rs

pub mod task;

use chrono::Utc;
use core_types::{Candle, Direction, ExitReason, InstrumentKey, Signal, Trade, TradingStyle};
use journal::{Journal, JournalFilter, KvStore, StateRepository, TradeStats};
use risk::{BracketSettings, RiskModel};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use strategy::{MarketView, StructureRule, StyleProfile, TrendReading};

/// The number of candles the replay task keeps in its sliding window.
pub const CANDLE_WINDOW_SIZE: usize = 200;

/// What one evaluation tick produced for a key.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    /// The trend filter's verdict; `None` while the window is too short.
    pub trend: Option<TrendReading>,
    /// The current RSI; `None` while the window is too short.
    pub rsi: Option<f64>,
    /// A signal emitted on this very tick, if any.
    pub new_signal: Option<Signal>,
    /// The signal currently open for the key after this tick, if any.
    pub active_signal: Option<Signal>,
    /// A trade closed on this very tick, if any.
    pub closed_trade: Option<Trade>,
}

/// Construction-time configuration for the engine.
pub struct EngineConfig {
    /// The style the engine starts under.
    pub style: TradingStyle,
    /// How many closed trades the journal retains.
    pub journal_capacity: usize,
    /// Whether a CHoCH satisfies the structure gate, or only a full BOS.
    pub structure_rule: StructureRule,
    /// Per-style profile overrides; styles not present use their built-ins.
    pub profiles: HashMap<TradingStyle, StyleProfile>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            style: TradingStyle::Day,
            journal_capacity: journal::DEFAULT_CAPACITY,
            structure_rule: StructureRule::default(),
            profiles: HashMap::new(),
        }
    }
}

/// The market-structure signal engine.
///
/// Owns the active-signal slot of every (symbol, interval) key and the trade
/// journal. Each call to [`evaluate`](SignalEngine::evaluate) is one
/// synchronous tick: detection, possibly an emission, then the lifecycle
/// check of whatever signal is open for the key. At most one signal is ever
/// open per key: the emission gate checks the active slot before anything
/// else, so a second open is impossible by construction.
pub struct SignalEngine {
    style: TradingStyle,
    profile: StyleProfile,
    structure_rule: StructureRule,
    profiles: HashMap<TradingStyle, StyleProfile>,
    risk_model: Box<dyn RiskModel>,
    repository: StateRepository,
    active: HashMap<InstrumentKey, Signal>,
    journal: Journal,
}

impl SignalEngine {
    /// Creates an engine and restores any state the store still holds.
    ///
    /// Restore failures (corrupt or foreign-version snapshots) are logged and
    /// the engine starts clean; they never abort construction.
    pub fn new(
        config: EngineConfig,
        risk_model: Box<dyn RiskModel>,
        store: Box<dyn KvStore>,
    ) -> Self {
        let profile = resolve_profile(&config.profiles, config.style);
        let mut engine = Self {
            style: config.style,
            profile,
            structure_rule: config.structure_rule,
            profiles: config.profiles,
            risk_model,
            repository: StateRepository::new(store),
            active: HashMap::new(),
            journal: Journal::new(config.journal_capacity),
        };
        engine.restore();
        engine
    }

    /// Runs one evaluation tick for a key.
    ///
    /// `candles` is the ascending window for the key; `current_price` is the
    /// latest traded price and is what exits are tested against. With a
    /// window shorter than the profile's requirement all detection is
    /// skipped, but an already-open signal is still checked for exit.
    pub fn evaluate(
        &mut self,
        key: &InstrumentKey,
        candles: &[Candle],
        current_price: Decimal,
    ) -> Evaluation {
        let required = self.profile.required_candles();
        let view = if candles.len() >= required {
            strategy::analyze(candles, &self.profile)
        } else {
            tracing::debug!(
                key = %key,
                have = candles.len(),
                need = required,
                "insufficient candle history; detection skipped for this tick"
            );
            MarketView::default()
        };

        // Emission runs before the lifecycle check: a tick that closes a
        // trade frees the key for a *later* tick, never for its own.
        let new_signal = if self.active.contains_key(key) {
            None
        } else {
            self.try_emit(key, candles, &view)
        };

        let closed_trade = self.check_active(key, current_price);

        Evaluation {
            trend: view.trend,
            rsi: view.rsi,
            new_signal,
            active_signal: self.active.get(key).cloned(),
            closed_trade,
        }
    }

    /// Switches the active style. An unknown name is rejected and the prior
    /// style stays active. Signals already open keep the style they were
    /// emitted under.
    pub fn set_style(&mut self, name: &str) -> core_types::Result<TradingStyle> {
        let style: TradingStyle = name.parse()?;
        self.style = style;
        self.profile = resolve_profile(&self.profiles, style);
        tracing::info!(style = %style, "trading style switched");
        Ok(style)
    }

    pub fn style(&self) -> TradingStyle {
        self.style
    }

    pub fn profile(&self) -> &StyleProfile {
        &self.profile
    }

    /// The signal currently open for a key, if any.
    pub fn active_signal(&self, key: &InstrumentKey) -> Option<&Signal> {
        self.active.get(key)
    }

    /// How many keys currently hold an open signal.
    pub fn open_signal_count(&self) -> usize {
        self.active.len()
    }

    /// Aggregate statistics over the journal.
    pub fn stats(&self) -> TradeStats {
        self.journal.stats()
    }

    /// A filtered, newest-first view of the journal.
    pub fn history(&self, filter: JournalFilter) -> Vec<&Trade> {
        self.journal.filter(filter)
    }

    /// Drops the whole trade history (open signals are unaffected).
    pub fn clear_history(&mut self) {
        self.journal.clear();
        if let Err(e) = self.repository.save_journal(&self.journal) {
            tracing::warn!(error = %e, "failed to persist cleared journal");
        }
    }

    /// Writes the current active-signal map and journal to the store.
    ///
    /// In-memory state is authoritative either way; a failure here loses
    /// nothing for the lifetime of the process.
    pub fn persist(&self) -> journal::Result<()> {
        self.repository
            .save_active_signals(self.active.values().cloned().collect())?;
        self.repository.save_journal(&self.journal)
    }

    fn restore(&mut self) {
        match self.repository.load_active_signals() {
            Ok(Some(signals)) => {
                tracing::info!(count = signals.len(), "restored active signals from store");
                for signal in signals {
                    self.active.insert(signal.key.clone(), signal);
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "could not restore active signals; starting clean")
            }
        }

        match self.repository.load_journal(self.journal.capacity()) {
            Ok(Some(journal)) => {
                tracing::info!(trades = journal.len(), "restored trade journal from store");
                self.journal = journal;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "could not restore trade journal; starting clean"),
        }
    }

    /// The emission gate. The caller has already established that the key
    /// has no open signal.
    fn try_emit(
        &mut self,
        key: &InstrumentKey,
        candles: &[Candle],
        view: &MarketView,
    ) -> Option<Signal> {
        let current = candles.last()?;
        let atr = view.atr?;

        let long_structure = view
            .bullish_break
            .as_ref()
            .is_some_and(|b| self.structure_rule.admits(b));
        let short_structure = view
            .bearish_break
            .as_ref()
            .is_some_and(|b| self.structure_rule.admits(b));

        // The long side is evaluated first when both sides qualify at once.
        let (direction, zone) = if long_structure && view.long_zone.is_some() {
            (Direction::Long, view.long_zone.clone()?)
        } else if short_structure && view.short_zone.is_some() {
            (Direction::Short, view.short_zone.clone()?)
        } else {
            return None;
        };

        let bracket_settings = BracketSettings {
            stop_loss_atr: self.profile.stop_loss_atr,
            take_profit_rr: self.profile.take_profit_rr,
            partial_tp_rr: self.profile.partial_tp_rr,
        };
        let bracket = match self
            .risk_model
            .plan(direction, current.close, atr, &bracket_settings)
        {
            Ok(bracket) => bracket,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "bracket planning failed; signal suppressed");
                return None;
            }
        };

        let signal = Signal {
            key: key.clone(),
            direction,
            entry_price: current.close,
            stop_loss: bracket.stop_loss,
            take_profit: bracket.take_profit,
            partial_take_profit: bracket.partial_take_profit,
            reward_multiple: bracket.reward_multiple,
            zone_kind: zone.kind,
            opened_at: Utc::now(),
            style: self.style,
        };

        tracing::info!(
            key = %key,
            direction = ?signal.direction,
            entry = %signal.entry_price,
            stop = %signal.stop_loss,
            target = %signal.take_profit,
            zone = ?signal.zone_kind,
            "signal emitted"
        );

        self.active.insert(key.clone(), signal.clone());
        if let Err(e) = self.persist() {
            tracing::warn!(key = %key, error = %e, "failed to persist emitted signal");
        }

        Some(signal)
    }

    /// The lifecycle check: tests the key's open signal against the latest
    /// price. The take-profit is tested before the stop-loss; when one
    /// candle sweeps both levels the trade is recorded as a take-profit.
    /// That tie-break is deliberate and covered by tests.
    fn check_active(&mut self, key: &InstrumentKey, current_price: Decimal) -> Option<Trade> {
        let signal = self.active.get(key)?;

        let exit = match signal.direction {
            Direction::Long => {
                if current_price >= signal.take_profit {
                    Some((signal.take_profit, ExitReason::TakeProfit))
                } else if current_price <= signal.stop_loss {
                    Some((signal.stop_loss, ExitReason::StopLoss))
                } else {
                    None
                }
            }
            Direction::Short => {
                if current_price <= signal.take_profit {
                    Some((signal.take_profit, ExitReason::TakeProfit))
                } else if current_price >= signal.stop_loss {
                    Some((signal.stop_loss, ExitReason::StopLoss))
                } else {
                    None
                }
            }
        };
        let (exit_price, exit_reason) = exit?;

        // The exit fires at the level itself, not at the observed price.
        let signal = self.active.remove(key)?;
        let trade = Trade::from_signal(signal, exit_price, exit_reason, Utc::now());

        tracing::info!(
            key = %key,
            outcome = ?trade.outcome,
            reason = ?trade.exit_reason,
            pnl_r = trade.pnl_r,
            "signal closed"
        );

        self.journal.record(trade.clone());
        if let Err(e) = self.persist() {
            tracing::warn!(key = %key, error = %e, "failed to persist closed trade");
        }

        Some(trade)
    }
}

fn resolve_profile(
    profiles: &HashMap<TradingStyle, StyleProfile>,
    style: TradingStyle,
) -> StyleProfile {
    profiles
        .get(&style)
        .cloned()
        .unwrap_or_else(|| StyleProfile::for_style(style))
}
