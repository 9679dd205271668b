//! Typst table markup for report sections.

use crate::domain::metrics::Metrics;
use crate::domain::order::Trade;
use crate::ports::report_port::ReportContext;

pub fn render_run_summary(ctx: &ReportContext) -> String {
    let mut out = String::from("#table(\n  columns: 2,\n  align: (left, right),\n");
    out.push_str(&format!("  [*Strategy*], [{}],\n", ctx.strategy_name));
    out.push_str(&format!(
        "  [*Initial Cash*], [{}],\n",
        fmt_currency(ctx.initial_cash)
    ));
    out.push_str(&format!("  [*Bars Replayed*], [{}],\n", ctx.history.len()));
    if let (Some(first), Some(last)) = (ctx.history.first(), ctx.history.last()) {
        out.push_str(&format!("  [*First Bar*], [{}],\n", first.timestamp));
        out.push_str(&format!("  [*Last Bar*], [{}],\n", last.timestamp));
        out.push_str(&format!("  [*Final NAV*], [{}],\n", fmt_currency(last.nav)));
    }
    out.push_str(&format!("  [*Trades Executed*], [{}],\n", ctx.trades.len()));
    out.push_str(")\n");
    out
}

pub fn render_metrics_table(metrics: &Metrics) -> String {
    let mut out = String::from("#table(\n  columns: 2,\n  align: (left, right),\n");
    out.push_str(&format!(
        "  [*Total Return*], [{:.2}%],\n",
        metrics.total_return * 100.0
    ));
    out.push_str(&format!(
        "  [*Annualized Return*], [{:.2}%],\n",
        metrics.annualized_return * 100.0
    ));
    out.push_str(&format!(
        "  [*Volatility*], [{:.2}%],\n",
        metrics.volatility * 100.0
    ));
    out.push_str(&format!(
        "  [*Sharpe Ratio*], [{:.2}],\n",
        metrics.sharpe_ratio
    ));
    out.push_str(&format!(
        "  [*Max Drawdown*], [-{:.1}%],\n",
        metrics.max_drawdown * 100.0
    ));
    out.push_str(&format!(
        "  [*Max Drawdown Duration*], [{} bars],\n",
        metrics.max_drawdown_duration
    ));
    out.push_str(")\n");
    out
}

/// Trade log sorted as executed. Realized PnL is intentionally omitted: it
/// is not computed in this core.
pub fn render_trade_log(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return "_No trades executed._".to_string();
    }

    let mut out = String::from(
        "#table(\n  columns: 5,\n  align: (left, left, left, right, right),\n",
    );
    out.push_str("  [*Date*], [*Symbol*], [*Side*], [*Quantity*], [*Price*],\n");
    for trade in trades {
        out.push_str(&format!(
            "  [{}], [{}], [{}], [{:.4}], [{:.2}],\n",
            trade.timestamp, trade.symbol, trade.side, trade.quantity, trade.price,
        ));
    }
    out.push_str(")\n");
    out
}

fn fmt_currency(value: f64) -> String {
    if value >= 0.0 {
        format!("${:.2}", value)
    } else {
        format!("-${:.2}", value.abs())
    }
}
