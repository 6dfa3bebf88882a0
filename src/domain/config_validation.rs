//! Configuration validation.
//!
//! Validates all config fields before a backtest runs. Missing numeric keys
//! fall back to the same defaults the CLI uses, so only values that are
//! present and wrong are rejected.

use crate::domain::error::QuantopsError;
use crate::domain::strategy::{MaCrossoverParams, MomentumParams, StrategyKind};
use crate::ports::config_port::ConfigPort;
use chrono::{NaiveDate, NaiveDateTime};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_COMMISSION: f64 = 0.001;
pub const DEFAULT_SLIPPAGE: f64 = 0.0005;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), QuantopsError> {
    validate_initial_capital(config)?;
    validate_rate(config, "commission", DEFAULT_COMMISSION)?;
    validate_rate(config, "slippage", DEFAULT_SLIPPAGE)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), QuantopsError> {
    let kind = strategy_kind(config)?;
    validate_strategy_symbols(config)?;
    validate_position_size(config)?;
    match kind {
        StrategyKind::Momentum => validate_rsi(config),
        StrategyKind::MaCrossover => validate_ma_periods(config),
    }
}

/// `[strategy] type`, defaulting to momentum when absent.
pub fn strategy_kind(config: &dyn ConfigPort) -> Result<StrategyKind, QuantopsError> {
    match config.get_string("strategy", "type") {
        None => Ok(StrategyKind::Momentum),
        Some(name) => StrategyKind::from_name(&name).ok_or_else(|| QuantopsError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "type".to_string(),
            reason: format!(
                "unknown strategy type '{}', expected one of: {}",
                name.trim(),
                StrategyKind::NAMES.join(", ")
            ),
        }),
    }
}

/// Parses `YYYY-MM-DD` (midnight) or a full timestamp.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Reads an optional date key; present but unparseable is an error.
pub fn config_datetime(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDateTime>, QuantopsError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_datetime(&s)
            .map(Some)
            .ok_or_else(|| QuantopsError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("invalid {key} format, expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"),
            }),
    }
}

/// Splits a comma separated symbol list, dropping blanks.
pub fn parse_symbols(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), QuantopsError> {
    let value = config.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL);
    if !value.is_finite() || value <= 0.0 {
        return Err(QuantopsError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_rate(config: &dyn ConfigPort, key: &str, default: f64) -> Result<(), QuantopsError> {
    let value = config.get_double("backtest", key, default);
    if !(0.0..1.0).contains(&value) {
        return Err(QuantopsError::ConfigInvalid {
            section: "backtest".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be in [0, 1)"),
        });
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), QuantopsError> {
    let start = config_datetime(config, "backtest", "start_date")?;
    let end = config_datetime(config, "backtest", "end_date")?;

    if matches!((start, end), (Some(start), Some(end)) if start > end) {
        return Err(QuantopsError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must not be after end_date".to_string(),
        });
    }
    Ok(())
}

fn validate_strategy_symbols(config: &dyn ConfigPort) -> Result<(), QuantopsError> {
    match config.get_string("strategy", "symbols") {
        Some(s) if parse_symbols(&s).is_empty() => Err(QuantopsError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "symbols".to_string(),
            reason: "symbols must list at least one symbol".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_position_size(config: &dyn ConfigPort) -> Result<(), QuantopsError> {
    let value = config.get_double("strategy", "position_size", MomentumParams::default().position_size);
    if !value.is_finite() || value <= 0.0 {
        return Err(QuantopsError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "position_size".to_string(),
            reason: "position_size must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_rsi(config: &dyn ConfigPort) -> Result<(), QuantopsError> {
    let defaults = MomentumParams::default();
    let period = config.get_int("strategy", "rsi_period", defaults.rsi_period as i64);
    if period < 1 {
        return Err(QuantopsError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "rsi_period".to_string(),
            reason: "rsi_period must be at least 1".to_string(),
        });
    }

    let oversold = config.get_double("strategy", "rsi_oversold", defaults.rsi_oversold);
    let overbought = config.get_double("strategy", "rsi_overbought", defaults.rsi_overbought);
    if !(0.0..=100.0).contains(&oversold) || !(0.0..=100.0).contains(&overbought) {
        return Err(QuantopsError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "rsi_oversold".to_string(),
            reason: "RSI thresholds must be between 0 and 100".to_string(),
        });
    }
    if oversold >= overbought {
        return Err(QuantopsError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "rsi_overbought".to_string(),
            reason: "rsi_overbought must be greater than rsi_oversold".to_string(),
        });
    }
    Ok(())
}

fn validate_ma_periods(config: &dyn ConfigPort) -> Result<(), QuantopsError> {
    let defaults = MaCrossoverParams::default();
    let fast = config.get_int("strategy", "fast_period", defaults.fast_period as i64);
    let slow = config.get_int("strategy", "slow_period", defaults.slow_period as i64);

    if fast < 1 {
        return Err(QuantopsError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "fast_period".to_string(),
            reason: "fast_period must be at least 1".to_string(),
        });
    }
    if fast >= slow {
        return Err(QuantopsError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "fast_period".to_string(),
            reason: "fast_period must be less than slow_period".to_string(),
        });
    }
    Ok(())
}
