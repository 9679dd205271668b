//! Performance metrics over a run's NAV series.
//!
//! Trade-level statistics are deliberately absent: realized per-trade PnL is
//! not computed in this core, so everything here derives from the snapshot
//! history alone.

use super::engine::Snapshot;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    /// Longest stretch of consecutive bars spent below a prior NAV peak.
    pub max_drawdown_duration: i64,
}

impl Metrics {
    pub fn compute(history: &[Snapshot], risk_free_rate: f64) -> Self {
        let first_nav = history.first().map(|s| s.nav).unwrap_or(0.0);
        let final_nav = history.last().map(|s| s.nav).unwrap_or(0.0);

        let total_return = if first_nav > 0.0 {
            (final_nav - first_nav) / first_nav
        } else {
            0.0
        };

        let bars = history.len() as f64;
        let years = bars / TRADING_DAYS_PER_YEAR;
        let annualized_return = if years > 0.0 && total_return.is_finite() && total_return > -1.0 {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let (max_drawdown, max_drawdown_duration) = compute_drawdown(history);

        let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
        let (volatility, sharpe_ratio) = compute_risk_adjusted(history, daily_rf);

        Metrics {
            total_return,
            annualized_return,
            volatility,
            sharpe_ratio,
            max_drawdown,
            max_drawdown_duration,
        }
    }
}

fn compute_drawdown(history: &[Snapshot]) -> (f64, i64) {
    if history.is_empty() {
        return (0.0, 0);
    }

    let mut peak = history[0].nav;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0i64;
    let mut current_dd_duration = 0i64;

    for snapshot in history {
        if snapshot.nav > peak {
            peak = snapshot.nav;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - snapshot.nav) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
            current_dd_duration += 1;
            if current_dd_duration > max_dd_duration {
                max_dd_duration = current_dd_duration;
            }
        }
    }

    (max_dd, max_dd_duration)
}

fn compute_risk_adjusted(history: &[Snapshot], daily_rf: f64) -> (f64, f64) {
    if history.len() < 2 {
        return (0.0, 0.0);
    }

    let returns: Vec<f64> = history
        .windows(2)
        .map(|w| {
            let prev = w[0].nav;
            let curr = w[1].nav;
            if prev > 0.0 { (curr - prev) / prev } else { 0.0 }
        })
        .collect();

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;

    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    let volatility = stddev * TRADING_DAYS_PER_YEAR.sqrt();

    let sharpe = if stddev > 0.0 {
        ((mean - daily_rf) / stddev) * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    };

    (volatility, sharpe)
}
