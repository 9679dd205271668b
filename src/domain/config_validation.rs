//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::BackonautError;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BackonautError> {
    validate_initial_cash(config)?;
    validate_risk_free_rate(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), BackonautError> {
    validate_csv_path(config)?;
    validate_symbol(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), BackonautError> {
    validate_strategy_name(config)?;
    validate_windows(config)?;
    validate_trade_amount(config)?;
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), BackonautError> {
    let value = config.get_double("backtest", "initial_cash", 100_000.0);
    if value <= 0.0 {
        return Err(BackonautError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), BackonautError> {
    let value = config.get_double("backtest", "risk_free_rate", 0.0);
    if value < 0.0 || value >= 1.0 {
        return Err(BackonautError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "risk_free_rate".to_string(),
            reason: "risk_free_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_csv_path(config: &dyn ConfigPort) -> Result<(), BackonautError> {
    match config.get_string("data", "csv_path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(BackonautError::ConfigMissing {
            section: "data".to_string(),
            key: "csv_path".to_string(),
        }),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), BackonautError> {
    match config.get_string("data", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(BackonautError::ConfigMissing {
            section: "data".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_strategy_name(config: &dyn ConfigPort) -> Result<(), BackonautError> {
    match config.get_string("strategy", "name") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(BackonautError::ConfigMissing {
            section: "strategy".to_string(),
            key: "name".to_string(),
        }),
    }
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), BackonautError> {
    let short = config.get_int("strategy", "short_window", 5);
    let long = config.get_int("strategy", "long_window", 20);

    if short < 1 {
        return Err(BackonautError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "short_window".to_string(),
            reason: "short_window must be at least 1".to_string(),
        });
    }
    if long < short {
        return Err(BackonautError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "long_window".to_string(),
            reason: "long_window must be at least short_window".to_string(),
        });
    }
    Ok(())
}

fn validate_trade_amount(config: &dyn ConfigPort) -> Result<(), BackonautError> {
    let value = config.get_double("strategy", "trade_amount", 100.0);
    if value <= 0.0 {
        return Err(BackonautError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "trade_amount".to_string(),
            reason: "trade_amount must be positive".to_string(),
        });
    }
    Ok(())
}
