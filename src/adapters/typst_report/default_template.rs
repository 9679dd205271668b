//! Built-in Typst report template with `{{PLACEHOLDER}}` markers.

pub fn template() -> &'static str {
    r#"#set page(
  paper: "a4",
  margin: (x: 2cm, y: 2.5cm),
)
#set text(font: "New Computer Modern", size: 10pt)
#set heading(numbering: "1.")

= Backtest Report

== Run Summary

{{RUN_SUMMARY}}

== Performance Metrics

{{METRICS_TABLE}}

== Net Asset Value

{{NAV_CHART}}

== Trade Log

{{TRADE_LOG}}
"#
}
