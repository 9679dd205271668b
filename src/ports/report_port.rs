//! Report generation port trait.

use std::path::Path;

use crate::domain::engine::Snapshot;
use crate::domain::error::BackonautError;
use crate::domain::metrics::Metrics;
use crate::domain::order::Trade;

/// Everything a report sink needs from a finished run.
pub struct ReportContext<'a> {
    pub strategy_name: &'a str,
    pub initial_cash: f64,
    pub history: &'a [Snapshot],
    pub trades: &'a [Trade],
    pub metrics: &'a Metrics,
}

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), BackonautError>;
}
