//! Deterministic replay loop tying feed, strategy, and portfolio together.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::bar::Bar;
use super::error::BackonautError;
use super::portfolio::Portfolio;
use super::strategy::Strategy;
use crate::ports::data_feed::DataFeed;

pub const DEFAULT_INITIAL_CASH: f64 = 100_000.0;

/// Per-bar record of the portfolio after that bar was processed. The
/// positions map is an owned copy, so later mutation of the live ledger
/// never reaches into earlier snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: NaiveDate,
    pub nav: f64,
    pub cash: f64,
    pub positions: HashMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Finished,
}

/// Single-threaded replay: each bar is fully processed (strategy decision,
/// order application, snapshot) before the next one is pulled. The engine
/// owns the strategy and portfolio for the length of the run.
pub struct BacktestEngine {
    strategy: Box<dyn Strategy>,
    feed: Box<dyn DataFeed>,
    portfolio: Portfolio,
    history: Vec<Snapshot>,
    marks: HashMap<String, f64>,
    last_timestamp: Option<NaiveDate>,
    state: EngineState,
}

impl BacktestEngine {
    pub fn new(strategy: Box<dyn Strategy>, feed: Box<dyn DataFeed>, initial_cash: f64) -> Self {
        BacktestEngine {
            strategy,
            feed,
            portfolio: Portfolio::new(initial_cash),
            history: Vec::new(),
            marks: HashMap::new(),
            last_timestamp: None,
            state: EngineState::Running,
        }
    }

    pub fn with_default_cash(strategy: Box<dyn Strategy>, feed: Box<dyn DataFeed>) -> Self {
        Self::new(strategy, feed, DEFAULT_INITIAL_CASH)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Snapshots accumulated so far, one per consumed bar. Empty before any
    /// run; after an aborted run it holds everything up to the failing bar.
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// Replay the feed to exhaustion. The first error from the feed, the
    /// strategy, or valuation aborts the run; nothing is caught or retried,
    /// and the engine stays in `Running` since the run did not terminate
    /// normally.
    pub fn run(&mut self) -> Result<(), BackonautError> {
        while self.state == EngineState::Running {
            let bar = match self.feed.next_bar()? {
                Some(bar) => bar,
                None => {
                    self.state = EngineState::Finished;
                    break;
                }
            };
            self.check_bar(&bar)?;

            if let Some(order) = self.strategy.on_data(&bar)? {
                self.portfolio.execute_order(order);
            }

            // Last-known close per symbol; for a single-symbol feed this is
            // just the current bar's close keyed by its own symbol.
            self.marks.insert(bar.symbol.clone(), bar.close);
            let nav = self.portfolio.net_liquidation(&self.marks)?;

            self.last_timestamp = Some(bar.timestamp);
            self.history.push(Snapshot {
                timestamp: bar.timestamp,
                nav,
                cash: self.portfolio.cash(),
                positions: self.portfolio.positions().clone(),
            });
        }
        Ok(())
    }

    /// Reject bars the strategy must never see: non-finite prices and
    /// timestamps that regress relative to the previous bar. Equal
    /// timestamps are allowed (delivery order is non-decreasing).
    fn check_bar(&self, bar: &Bar) -> Result<(), BackonautError> {
        if !bar.is_well_formed() {
            return Err(BackonautError::MalformedBar {
                symbol: bar.symbol.clone(),
                timestamp: bar.timestamp,
                reason: "non-finite or non-positive price field".into(),
            });
        }
        if let Some(last) = self.last_timestamp {
            if bar.timestamp < last {
                return Err(BackonautError::MalformedBar {
                    symbol: bar.symbol.clone(),
                    timestamp: bar.timestamp,
                    reason: format!("timestamp regressed, previous bar was {last}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_feed::MemoryFeed;
    use crate::domain::order::{Order, Side};

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            symbol: "TEST".into(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        }
    }

    struct NoOp;

    impl Strategy for NoOp {
        fn name(&self) -> &str {
            "noop"
        }

        fn on_data(&mut self, _bar: &Bar) -> Result<Option<Order>, BackonautError> {
            Ok(None)
        }
    }

    /// Buys one unit on the first call, sells it on the second.
    struct BuyThenSell {
        calls: usize,
    }

    impl Strategy for BuyThenSell {
        fn name(&self) -> &str {
            "buy_then_sell"
        }

        fn on_data(&mut self, bar: &Bar) -> Result<Option<Order>, BackonautError> {
            self.calls += 1;
            let side = match self.calls {
                1 => Side::Buy,
                2 => Side::Sell,
                _ => return Ok(None),
            };
            Ok(Some(Order::new(
                bar.symbol.clone(),
                1.0,
                bar.close,
                side,
                bar.timestamp,
            )?))
        }
    }

    /// Buys a symbol no bar will ever carry a price for.
    struct BuysUnknownSymbol;

    impl Strategy for BuysUnknownSymbol {
        fn name(&self) -> &str {
            "buys_unknown"
        }

        fn on_data(&mut self, bar: &Bar) -> Result<Option<Order>, BackonautError> {
            Ok(Some(Order::new(
                "GHOST",
                1.0,
                50.0,
                Side::Buy,
                bar.timestamp,
            )?))
        }
    }

    fn engine_with(bars: Vec<Bar>, strategy: Box<dyn Strategy>) -> BacktestEngine {
        BacktestEngine::new(strategy, Box::new(MemoryFeed::new(bars)), 1_000.0)
    }

    #[test]
    fn history_before_any_run_is_empty() {
        let engine = engine_with(vec![bar(1, 100.0)], Box::new(NoOp));
        assert!(engine.history().is_empty());
        assert_eq!(engine.state(), EngineState::Running);
    }

    #[test]
    fn empty_feed_finishes_with_empty_history() {
        let mut engine = engine_with(vec![], Box::new(NoOp));
        engine.run().unwrap();

        assert!(engine.history().is_empty());
        assert_eq!(engine.state(), EngineState::Finished);
    }

    #[test]
    fn one_snapshot_per_bar() {
        let bars = vec![bar(1, 100.0), bar(2, 101.0), bar(3, 102.0)];
        let mut engine = engine_with(bars, Box::new(NoOp));
        engine.run().unwrap();

        assert_eq!(engine.history().len(), 3);
        assert_eq!(engine.state(), EngineState::Finished);
        for snapshot in engine.history() {
            assert!((snapshot.nav - 1_000.0).abs() < f64::EPSILON);
            assert!((snapshot.cash - 1_000.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn buy_then_sell_round_trip_flattens() {
        let bars = vec![bar(1, 100.0), bar(2, 100.0), bar(3, 100.0)];
        let mut engine = engine_with(bars, Box::new(BuyThenSell { calls: 0 }));
        engine.run().unwrap();

        assert_eq!(engine.history().len(), 3);
        let last = engine.history().last().unwrap();
        assert_eq!(last.positions.get("TEST").copied().unwrap_or(0.0), 0.0);
        assert!((last.cash - 1_000.0).abs() < f64::EPSILON);
        assert_eq!(engine.portfolio().trades().len(), 2);
    }

    #[test]
    fn nav_marks_position_at_current_close() {
        let bars = vec![bar(1, 100.0), bar(2, 110.0)];
        let mut engine = engine_with(bars, Box::new(BuyThenSell { calls: 0 }));
        engine.run().unwrap();

        // Bought 1 unit at 100 on the first bar; second bar sells at 110.
        let first = &engine.history()[0];
        assert!((first.cash - 900.0).abs() < f64::EPSILON);
        assert!((first.nav - 1_000.0).abs() < f64::EPSILON);

        let second = &engine.history()[1];
        assert!((second.cash - 1_010.0).abs() < f64::EPSILON);
        assert!((second.nav - 1_010.0).abs() < f64::EPSILON);
    }

    #[test]
    fn snapshots_are_defensive_copies() {
        let bars = vec![bar(1, 100.0), bar(2, 100.0)];
        let mut engine = engine_with(bars, Box::new(BuyThenSell { calls: 0 }));
        engine.run().unwrap();

        // First snapshot was taken while long; the later sell must not have
        // rewritten it.
        assert_eq!(engine.history()[0].positions.get("TEST"), Some(&1.0));
        assert_eq!(engine.history()[1].positions.get("TEST"), Some(&0.0));
    }

    #[test]
    fn timestamp_regression_aborts_run() {
        let bars = vec![bar(5, 100.0), bar(3, 101.0)];
        let mut engine = engine_with(bars, Box::new(NoOp));
        let result = engine.run();

        assert!(matches!(result, Err(BackonautError::MalformedBar { .. })));
        // History up to the failing bar stays inspectable.
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.state(), EngineState::Running);
    }

    #[test]
    fn equal_timestamps_are_accepted() {
        let bars = vec![bar(1, 100.0), bar(1, 101.0)];
        let mut engine = engine_with(bars, Box::new(NoOp));
        engine.run().unwrap();
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn non_finite_close_aborts_run() {
        let bars = vec![bar(1, 100.0), bar(2, f64::NAN)];
        let mut engine = engine_with(bars, Box::new(NoOp));
        let result = engine.run();

        assert!(matches!(result, Err(BackonautError::MalformedBar { .. })));
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn valuing_an_unpriced_symbol_aborts_run() {
        let bars = vec![bar(1, 100.0)];
        let mut engine = engine_with(bars, Box::new(BuysUnknownSymbol));
        let result = engine.run();

        assert!(
            matches!(result, Err(BackonautError::MissingPrice { symbol }) if symbol == "GHOST")
        );
        assert!(engine.history().is_empty());
    }

    #[test]
    fn multi_symbol_valuation_uses_last_known_closes() {
        let mut bars = vec![bar(1, 100.0), bar(2, 100.0)];
        bars[1].symbol = "OTHER".into();

        // Buys one TEST unit on the first bar; the second bar is OTHER, so
        // TEST is valued at its last known close.
        let mut engine = engine_with(bars, Box::new(BuyThenSell { calls: 0 }));
        engine.run().unwrap();

        let last = engine.history().last().unwrap();
        assert_eq!(last.positions.get("TEST"), Some(&1.0));
        assert_eq!(last.positions.get("OTHER"), Some(&(-1.0)));
        // cash 1000 - 100 + 100; TEST at 100, OTHER short at 100.
        assert!((last.nav - 1_000.0).abs() < f64::EPSILON);
    }
}
