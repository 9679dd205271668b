//! Strategy contract and config-driven construction.

pub mod ma_cross;
pub mod three_day_down;

pub use ma_cross::MaCrossStrategy;
pub use three_day_down::ThreeDayDownStrategy;

use crate::domain::bar::Bar;
use crate::domain::error::BackonautError;
use crate::domain::order::Order;
use crate::ports::config_port::ConfigPort;

/// Stateful decision function: one bar in, zero or one order out.
///
/// Strategies may keep whatever internal state they need (rolling windows,
/// position flags) but never mutate the portfolio or the feed.
pub trait Strategy {
    fn name(&self) -> &str;
    fn on_data(&mut self, bar: &Bar) -> Result<Option<Order>, BackonautError>;
}

/// Build the strategy named in `[strategy]` config. Selection happens here,
/// at composition time; the engine only ever sees the trait object.
pub fn build_strategy(config: &dyn ConfigPort) -> Result<Box<dyn Strategy>, BackonautError> {
    let name = config
        .get_string("strategy", "name")
        .ok_or_else(|| BackonautError::ConfigMissing {
            section: "strategy".into(),
            key: "name".into(),
        })?;

    match name.as_str() {
        "ma_cross" => {
            let short_window = config.get_int("strategy", "short_window", 5);
            let long_window = config.get_int("strategy", "long_window", 20);
            if short_window < 1 {
                return Err(BackonautError::ConfigInvalid {
                    section: "strategy".into(),
                    key: "short_window".into(),
                    reason: "must be at least 1".into(),
                });
            }
            if long_window < short_window {
                return Err(BackonautError::ConfigInvalid {
                    section: "strategy".into(),
                    key: "long_window".into(),
                    reason: "must be at least short_window".into(),
                });
            }
            Ok(Box::new(MaCrossStrategy::new(
                short_window as usize,
                long_window as usize,
            )))
        }
        "three_day_down" => {
            let trade_amount = config.get_double("strategy", "trade_amount", 100.0);
            if trade_amount <= 0.0 {
                return Err(BackonautError::ConfigInvalid {
                    section: "strategy".into(),
                    key: "trade_amount".into(),
                    reason: "must be positive".into(),
                });
            }
            Ok(Box::new(ThreeDayDownStrategy::new(trade_amount)))
        }
        other => Err(BackonautError::ConfigInvalid {
            section: "strategy".into(),
            key: "name".into(),
            reason: format!("unknown strategy {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn build_ma_cross_from_config() {
        let config = FileConfigAdapter::from_string(
            "[strategy]\nname = ma_cross\nshort_window = 3\nlong_window = 10\n",
        )
        .unwrap();
        let strategy = build_strategy(&config).unwrap();
        assert_eq!(strategy.name(), "ma_cross");
    }

    #[test]
    fn build_three_day_down_from_config() {
        let config = FileConfigAdapter::from_string(
            "[strategy]\nname = three_day_down\ntrade_amount = 300\n",
        )
        .unwrap();
        let strategy = build_strategy(&config).unwrap();
        assert_eq!(strategy.name(), "three_day_down");
    }

    #[test]
    fn missing_name_is_error() {
        let config = FileConfigAdapter::from_string("[strategy]\n").unwrap();
        let result = build_strategy(&config);
        assert!(matches!(result, Err(BackonautError::ConfigMissing { .. })));
    }

    #[test]
    fn unknown_name_is_error() {
        let config = FileConfigAdapter::from_string("[strategy]\nname = hodl\n").unwrap();
        let result = build_strategy(&config);
        assert!(matches!(result, Err(BackonautError::ConfigInvalid { .. })));
    }

    #[test]
    fn inverted_windows_are_rejected() {
        let config = FileConfigAdapter::from_string(
            "[strategy]\nname = ma_cross\nshort_window = 20\nlong_window = 5\n",
        )
        .unwrap();
        let result = build_strategy(&config);
        assert!(matches!(result, Err(BackonautError::ConfigInvalid { .. })));
    }

    #[test]
    fn non_positive_trade_amount_is_rejected() {
        let config = FileConfigAdapter::from_string(
            "[strategy]\nname = three_day_down\ntrade_amount = 0\n",
        )
        .unwrap();
        let result = build_strategy(&config);
        assert!(matches!(result, Err(BackonautError::ConfigInvalid { .. })));
    }
}
