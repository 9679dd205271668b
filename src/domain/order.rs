//! Order and trade value types.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use super::error::BackonautError;

/// Direction of a requested transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for Side {
    type Err = BackonautError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(BackonautError::InvalidOrder {
                reason: format!("unknown side {other:?}"),
            }),
        }
    }
}

/// A requested transaction. Validated at construction; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    symbol: String,
    quantity: f64,
    price: f64,
    side: Side,
    timestamp: NaiveDate,
}

impl Order {
    /// Build an order, rejecting non-positive quantities and prices so that
    /// no invalid order ever reaches the portfolio.
    pub fn new(
        symbol: impl Into<String>,
        quantity: f64,
        price: f64,
        side: Side,
        timestamp: NaiveDate,
    ) -> Result<Self, BackonautError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(BackonautError::InvalidOrder {
                reason: format!("quantity must be positive, got {quantity}"),
            });
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(BackonautError::InvalidOrder {
                reason: format!("price must be positive, got {price}"),
            });
        }
        Ok(Order {
            symbol: symbol.into(),
            quantity,
            price,
            side,
            timestamp,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn timestamp(&self) -> NaiveDate {
        self.timestamp
    }

    /// Signed notional of the order: negative cash flow for a buy,
    /// positive for a sell.
    pub fn cash_delta(&self) -> f64 {
        match self.side {
            Side::Buy => -(self.quantity * self.price),
            Side::Sell => self.quantity * self.price,
        }
    }
}

/// Immutable snapshot of an executed order, recorded in the trade log.
///
/// `realized_pnl` is reserved for a future extension and is always 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    pub side: Side,
    pub timestamp: NaiveDate,
    pub realized_pnl: f64,
}

impl From<&Order> for Trade {
    fn from(order: &Order) -> Self {
        Trade {
            symbol: order.symbol.clone(),
            quantity: order.quantity,
            price: order.price,
            side: order.side,
            timestamp: order.timestamp,
            realized_pnl: 0.0,
        }
    }
}
