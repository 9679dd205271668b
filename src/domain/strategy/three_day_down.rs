//! Three-down-closes accumulator strategy.
//!
//! Buys a fixed notional after three strictly decreasing closes and never
//! sells, so the position only grows over a run (dollar-cost averaging into
//! weakness). After each buy the close window restarts from the current bar.

use crate::domain::bar::Bar;
use crate::domain::error::BackonautError;
use crate::domain::order::{Order, Side};
use crate::domain::strategy::Strategy;

const WINDOW: usize = 3;

pub struct ThreeDayDownStrategy {
    trade_amount: f64,
    closes: Vec<f64>,
}

impl ThreeDayDownStrategy {
    /// `trade_amount` is the notional spent per triggered buy.
    pub fn new(trade_amount: f64) -> Self {
        ThreeDayDownStrategy {
            trade_amount,
            closes: Vec::new(),
        }
    }

    fn strictly_decreasing(&self) -> bool {
        self.closes.windows(2).all(|w| w[0] > w[1])
    }
}

impl Strategy for ThreeDayDownStrategy {
    fn name(&self) -> &str {
        "three_day_down"
    }

    fn on_data(&mut self, bar: &Bar) -> Result<Option<Order>, BackonautError> {
        self.closes.push(bar.close);
        if self.closes.len() > WINDOW {
            self.closes.remove(0);
        }
        if self.closes.len() < WINDOW || !self.strictly_decreasing() {
            return Ok(None);
        }

        let quantity = self.trade_amount / bar.close;
        if quantity == 0.0 || !quantity.is_finite() {
            // Price too large for the configured notional; window keeps
            // sliding rather than restarting.
            return Ok(None);
        }

        self.closes = vec![bar.close];
        let order = Order::new(
            bar.symbol.clone(),
            quantity,
            bar.close,
            Side::Buy,
            bar.timestamp,
        )?;
        Ok(Some(order))
    }
}
