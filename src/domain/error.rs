//! Domain error types.

/// Failure raised by a strategy while evaluating a snapshot.
///
/// Distinct from "no signal": a strategy with too little history returns
/// `Ok(None)`, never one of these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StrategyError {
    #[error("malformed market data for {symbol}: {reason}")]
    MalformedData { symbol: String, reason: String },

    #[error("invalid signal: {reason}")]
    InvalidSignal { reason: String },
}

/// Top-level error type for quantops.
#[derive(Debug, thiserror::Error)]
pub enum QuantopsError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("strategy failed: {0}")]
    Strategy(#[from] StrategyError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuantopsError> for std::process::ExitCode {
    fn from(err: &QuantopsError) -> Self {
        let code: u8 = match err {
            QuantopsError::Io(_) => 1,
            QuantopsError::ConfigParse { .. }
            | QuantopsError::ConfigMissing { .. }
            | QuantopsError::ConfigInvalid { .. } => 2,
            QuantopsError::Data { .. } => 3,
            QuantopsError::Strategy(_) => 4,
            QuantopsError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_error_converts_into_top_level() {
        let err: QuantopsError = StrategyError::MalformedData {
            symbol: "BTC/USDT".into(),
            reason: "non-finite close".into(),
        }
        .into();
        assert!(matches!(err, QuantopsError::Strategy(_)));
        assert_eq!(
            err.to_string(),
            "strategy failed: malformed market data for BTC/USDT: non-finite close"
        );
    }

    #[test]
    fn config_invalid_message() {
        let err = QuantopsError::ConfigInvalid {
            section: "backtest".into(),
            key: "commission".into(),
            reason: "must be non-negative".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [backtest] commission: must be non-negative"
        );
    }

    #[test]
    fn exit_codes_are_distinct_per_category() {
        use std::process::ExitCode;

        let config = QuantopsError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        };
        let data = QuantopsError::Data {
            reason: "bad row".into(),
        };
        let no_data = QuantopsError::NoData {
            symbol: "ETH/USDT".into(),
        };
        let code = |e: &QuantopsError| format!("{:?}", ExitCode::from(e));
        assert_eq!(code(&config), format!("{:?}", ExitCode::from(2)));
        assert_eq!(code(&data), format!("{:?}", ExitCode::from(3)));
        assert_eq!(code(&no_data), format!("{:?}", ExitCode::from(5)));
    }
}
