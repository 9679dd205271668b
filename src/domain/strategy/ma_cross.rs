//! Moving-average cross strategy.
//!
//! Holds either nothing or one fixed-size long position. Goes long when the
//! short moving average of closes rises above the long one, flattens when it
//! falls back below. Equality is a no-op in both states.

use crate::domain::bar::Bar;
use crate::domain::error::BackonautError;
use crate::domain::order::{Order, Side};
use crate::domain::strategy::Strategy;

/// Units per entry/exit order.
pub const ORDER_QUANTITY: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionState {
    Flat,
    Long,
}

pub struct MaCrossStrategy {
    short_window: usize,
    long_window: usize,
    closes: Vec<f64>,
    state: PositionState,
}

impl MaCrossStrategy {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        MaCrossStrategy {
            short_window,
            long_window,
            closes: Vec::new(),
            state: PositionState::Flat,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

impl Strategy for MaCrossStrategy {
    fn name(&self) -> &str {
        "ma_cross"
    }

    fn on_data(&mut self, bar: &Bar) -> Result<Option<Order>, BackonautError> {
        self.closes.push(bar.close);
        if self.closes.len() < self.long_window {
            return Ok(None);
        }

        // Recomputed from the trailing slices on every call; windows are
        // small enough that rolling sums would not change anything visible.
        let short_ma = mean(&self.closes[self.closes.len() - self.short_window..]);
        let long_ma = mean(&self.closes[self.closes.len() - self.long_window..]);

        match self.state {
            PositionState::Flat if short_ma > long_ma => {
                self.state = PositionState::Long;
                let order = Order::new(
                    bar.symbol.clone(),
                    ORDER_QUANTITY,
                    bar.close,
                    Side::Buy,
                    bar.timestamp,
                )?;
                Ok(Some(order))
            }
            PositionState::Long if short_ma < long_ma => {
                self.state = PositionState::Flat;
                let order = Order::new(
                    bar.symbol.clone(),
                    ORDER_QUANTITY,
                    bar.close,
                    Side::Sell,
                    bar.timestamp,
                )?;
                Ok(Some(order))
            }
            _ => Ok(None),
        }
    }
}
