//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_feed::CsvFeed;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::typst_report::TypstReportAdapter;
use crate::domain::config_validation::{
    validate_backtest_config, validate_data_config, validate_strategy_config,
};
use crate::domain::engine::{BacktestEngine, DEFAULT_INITIAL_CASH};
use crate::domain::error::BackonautError;
use crate::domain::metrics::Metrics;
use crate::domain::strategy::build_strategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::{ReportContext, ReportPort};

#[derive(Parser, Debug)]
#[command(name = "backonaut", about = "Offline bar-replay strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show bar count and date range for the configured data
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            dry_run,
        } => {
            if dry_run {
                run_validate(&config)
            } else {
                run_backtest(&config, output.as_ref())
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { config } => run_info(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = BackonautError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn validate_all(adapter: &dyn ConfigPort) -> Result<(), BackonautError> {
    validate_backtest_config(adapter)?;
    validate_data_config(adapter)?;
    validate_strategy_config(adapter)?;
    Ok(())
}

fn run_backtest(config_path: &PathBuf, output_path: Option<&PathBuf>) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_all(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Build strategy
    let strategy = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let strategy_name = strategy.name().to_string();
    eprintln!("Strategy: {}", strategy_name);

    // Stage 3: Materialize the bar feed
    let csv_path = adapter.get_string("data", "csv_path").unwrap_or_default();
    let symbol = adapter.get_string("data", "symbol").unwrap_or_default();

    eprintln!("Loading bars from {} for {}", csv_path, symbol);
    let feed = match CsvFeed::from_path(&csv_path, &symbol) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("  {} bars loaded", feed.len());

    // Stage 4: Replay
    let initial_cash = adapter.get_double("backtest", "initial_cash", DEFAULT_INITIAL_CASH);
    let risk_free_rate = adapter.get_double("backtest", "risk_free_rate", 0.0);

    let mut engine = BacktestEngine::new(strategy, Box::new(feed), initial_cash);
    if let Err(e) = engine.run() {
        eprintln!("error: {e}");
        eprintln!(
            "run aborted after {} bars; accounting state is not trusted further",
            engine.history().len()
        );
        return (&e).into();
    }

    // Stage 5: Metrics and console summary
    let metrics = Metrics::compute(engine.history(), risk_free_rate);

    eprintln!("\n=== Results ===");
    eprintln!("Bars Replayed:    {}", engine.history().len());
    eprintln!("Trades Executed:  {}", engine.portfolio().trades().len());
    eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
    eprintln!(
        "Annualized:       {:.2}%",
        metrics.annualized_return * 100.0
    );
    eprintln!("Volatility:       {:.2}%", metrics.volatility * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", metrics.sharpe_ratio);
    eprintln!("Max Drawdown:     -{:.1}%", metrics.max_drawdown * 100.0);
    if let Some(last) = engine.history().last() {
        eprintln!("Final NAV:        {:.2}", last.nav);
    }

    // Stage 6: Write report
    let reporter = match adapter.get_string("report", "template_path") {
        Some(path) => match TypstReportAdapter::from_template_file(&path) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
        None => TypstReportAdapter::new(),
    };

    let output = output_path
        .cloned()
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("report.typ"));

    let ctx = ReportContext {
        strategy_name: &strategy_name,
        initial_cash,
        history: engine.history(),
        trades: engine.portfolio().trades(),
        metrics: &metrics,
    };

    match reporter.write(&ctx, &output) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_all(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Resolve the strategy too, so unknown names fail here and not mid-run.
    let strategy = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nConfiguration is valid");
    eprintln!("  strategy: {}", strategy.name());
    eprintln!(
        "  data:     {} ({})",
        adapter.get_string("data", "csv_path").unwrap_or_default(),
        adapter.get_string("data", "symbol").unwrap_or_default(),
    );
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let csv_path = adapter.get_string("data", "csv_path").unwrap_or_default();
    let symbol = adapter.get_string("data", "symbol").unwrap_or_default();

    let feed = match CsvFeed::from_path(&csv_path, &symbol) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match feed.data_range() {
        Some((start, end)) => {
            println!("{}: {} bars, {} to {}", symbol, feed.len(), start, end);
        }
        None => {
            eprintln!("{}: no data found", symbol);
        }
    }
    ExitCode::SUCCESS
}
