#![allow(dead_code)]

use chrono::NaiveDate;
use backonaut::domain::bar::Bar;
use backonaut::domain::error::BackonautError;
use backonaut::domain::order::{Order, Side};
use backonaut::domain::strategy::Strategy;

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(chrono::Days::new((day - 1) as u64))
        .unwrap()
}

pub fn make_bar(symbol: &str, day: u32, close: f64) -> Bar {
    Bar {
        symbol: symbol.to_string(),
        timestamp: date(day),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1_000 + day as i64 * 100,
    }
}

pub fn make_bars(symbol: &str, closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(symbol, i as u32 + 1, close))
        .collect()
}

/// Test strategy: buys one unit on its first call, sells it on the second,
/// then stays idle.
pub struct BuyFirstSellSecond {
    calls: usize,
}

impl BuyFirstSellSecond {
    pub fn new() -> Self {
        BuyFirstSellSecond { calls: 0 }
    }
}

impl Strategy for BuyFirstSellSecond {
    fn name(&self) -> &str {
        "buy_first_sell_second"
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

/// Test strategy that never trades.
pub struct Idle;

impl Strategy for Idle {
    fn name(&self) -> &str {
        "idle"
    }

    fn on_data(&mut self, _bar: &Bar) -> Result<Option<Order>, BackonautError> {
        Ok(None)
    }
}
