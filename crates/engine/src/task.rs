use crate::{Evaluation, SignalEngine, CANDLE_WINDOW_SIZE};
use core_types::{Candle, InstrumentKey};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A self-contained task that replays one instrument's candle series through
/// the shared engine, one tick per candle.
///
/// The engine is shared behind a mutex: each tick locks it, evaluates, and
/// releases, so independent instruments interleave without ever touching the
/// same key's state concurrently.
pub struct ReplayTask {
    key: InstrumentKey,
    candles: Vec<Candle>,
    engine: Arc<Mutex<SignalEngine>>,
    // The in-memory "hot" window of recent candles for this instrument
    window: VecDeque<Candle>,
}

/// What a finished replay saw, for the caller's summary output.
#[derive(Debug, Clone)]
pub struct ReplaySummary {
    pub key: InstrumentKey,
    pub ticks: usize,
    pub signals_emitted: usize,
    pub trades_closed: usize,
}

impl ReplayTask {
    pub fn new(key: InstrumentKey, candles: Vec<Candle>, engine: Arc<Mutex<SignalEngine>>) -> Self {
        Self {
            key,
            candles,
            engine,
            window: VecDeque::with_capacity(CANDLE_WINDOW_SIZE + 1),
        }
    }

    /// Replays every candle in order and returns what happened.
    pub async fn run(mut self) -> anyhow::Result<ReplaySummary> {
        tracing::info!(
            key = %self.key,
            candles = self.candles.len(),
            "starting replay task"
        );

        // Ticks must arrive oldest-first for a key; candle files are sorted
        // rather than trusted.
        self.candles.sort_by_key(|c| c.open_time);

        let mut summary = ReplaySummary {
            key: self.key.clone(),
            ticks: 0,
            signals_emitted: 0,
            trades_closed: 0,
        };

        for candle in self.candles {
            self.window.push_back(candle.clone());
            if self.window.len() > CANDLE_WINDOW_SIZE {
                self.window.pop_front();
            }

            let history: Vec<Candle> = self.window.iter().cloned().collect();
            // Between price polls the freshest close doubles as the price.
            let current_price = candle.close;

            let evaluation: Evaluation = {
                let mut engine = self.engine.lock().await;
                engine.evaluate(&self.key, &history, current_price)
            };

            summary.ticks += 1;
            if evaluation.new_signal.is_some() {
                summary.signals_emitted += 1;
            }
            if evaluation.closed_trade.is_some() {
                summary.trades_closed += 1;
            }
        }

        tracing::info!(
            key = %self.key,
            ticks = summary.ticks,
            signals = summary.signals_emitted,
            trades = summary.trades_closed,
            "replay task finished"
        );

        Ok(summary)
    }
}
