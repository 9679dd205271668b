//! Portfolio accounting: cash balance, position ledger, trade log.

use std::collections::HashMap;

use super::error::BackonautError;
use super::order::{Order, Side, Trade};

/// Cash plus a signed per-symbol position ledger and an append-only trade
/// log. Owned and mutated exclusively by the engine for the length of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    cash: f64,
    positions: HashMap<String, f64>,
    trades: Vec<Trade>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Portfolio {
            cash: initial_cash,
            positions: HashMap::new(),
            trades: Vec::new(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Signed quantity held for `symbol`; untouched symbols read as zero.
    pub fn position(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn positions(&self) -> &HashMap<String, f64> {
        &self.positions
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Apply a pre-validated order: adjust cash by the signed notional,
    /// adjust the symbol's position, and append one trade. Positions may go
    /// negative; no solvency or margin check is made here.
    pub fn execute_order(&mut self, order: Order) {
        self.cash += order.cash_delta();
        let entry = self.positions.entry(order.symbol().to_string()).or_insert(0.0);
        match order.side() {
            Side::Buy => *entry += order.quantity(),
            Side::Sell => *entry -= order.quantity(),
        }
        self.trades.push(Trade::from(&order));
    }

    /// Cash plus the market value of every non-zero position, using a
    /// per-symbol price lookup. A held symbol missing from `prices` is an
    /// error; another symbol's price is never substituted.
    pub fn net_liquidation(
        &self,
        prices: &HashMap<String, f64>,
    ) -> Result<f64, BackonautError> {
        let mut value = self.cash;
        for (symbol, &quantity) in &self.positions {
            if quantity == 0.0 {
                continue;
            }
            let price = prices
                .get(symbol)
                .ok_or_else(|| BackonautError::MissingPrice {
                    symbol: symbol.clone(),
                })?;
            value += quantity * price;
        }
        Ok(value)
    }
}
