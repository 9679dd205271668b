//! Typst report generation.
//!
//! Resolves `{{PLACEHOLDER}}` markers in a Typst template (built-in default
//! or user-supplied) against a finished run and writes the final `.typ`
//! file, ready for `typst compile`.

pub mod chart;
pub mod default_template;
pub mod tables;

use std::fs;
use std::path::Path;

use crate::domain::error::BackonautError;
use crate::ports::report_port::{ReportContext, ReportPort};

/// Resolve all `{{PLACEHOLDER}}`s in the template and return the final
/// Typst markup.
pub fn resolve(template: &str, ctx: &ReportContext) -> String {
    let mut output = template.to_string();

    output = output.replace("{{RUN_SUMMARY}}", &tables::render_run_summary(ctx));
    output = output.replace(
        "{{METRICS_TABLE}}",
        &tables::render_metrics_table(ctx.metrics),
    );
    output = output.replace("{{NAV_CHART}}", &chart::format_nav_chart(ctx.history));
    output = output.replace("{{TRADE_LOG}}", &tables::render_trade_log(ctx.trades));

    output
}

/// Report sink that renders a Typst document.
pub struct TypstReportAdapter {
    template: Option<String>,
}

impl TypstReportAdapter {
    /// Use the built-in template.
    pub fn new() -> Self {
        TypstReportAdapter { template: None }
    }

    /// Use a custom template read from `path`.
    pub fn from_template_file<P: AsRef<Path>>(path: P) -> Result<Self, BackonautError> {
        let template = fs::read_to_string(path.as_ref()).map_err(|e| BackonautError::Data {
            reason: format!(
                "failed to read template {}: {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Ok(TypstReportAdapter {
            template: Some(template),
        })
    }
}

impl Default for TypstReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), BackonautError> {
        let template = self
            .template
            .as_deref()
            .unwrap_or_else(|| default_template::template());
        let content = resolve(template, ctx);
        fs::write(output_path, content)?;
        Ok(())
    }
}
