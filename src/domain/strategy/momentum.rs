//! RSI + MACD momentum strategy.
//!
//! Buy: RSI < oversold, MACD above its signal line, and MACD was at or below
//! the signal on the previous bar (fresh upward cross).
//! Sell: RSI > overbought, MACD below its signal line, and MACD was at or
//! above the signal on the previous bar.
//!
//! Symbols are evaluated in configured order and the first one that
//! qualifies wins; later symbols are not looked at that tick.

use super::{checked_closes, Signal, Strategy};
use crate::domain::error::StrategyError;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::{calculate_macd_default, calculate_rsi, IndicatorType};
use crate::domain::replay::MarketSnapshot;

/// Bars required per symbol before the strategy will evaluate it.
pub const MIN_HISTORY_BARS: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumParams {
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    /// Units traded per signal.
    pub position_size: f64,
}

impl Default for MomentumParams {
    fn default() -> Self {
        MomentumParams {
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            position_size: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MomentumStrategy {
    name: String,
    symbols: Vec<String>,
    params: MomentumParams,
}

impl MomentumStrategy {
    pub fn new(name: impl Into<String>, symbols: Vec<String>, params: MomentumParams) -> Self {
        Self {
            name: name.into(),
            symbols,
            params,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn params(&self) -> &MomentumParams {
        &self.params
    }

    fn evaluate(&self, symbol: &str, closes: &[f64]) -> Option<Signal> {
        let n = closes.len();
        let rsi = calculate_rsi(closes, self.params.rsi_period);
        let macd = calculate_macd_default(closes);

        let (last, prev) = (n - 1, n - 2);
        let row = [
            rsi[last],
            rsi[prev],
            macd.line[last],
            macd.signal[last],
            macd.line[prev],
            macd.signal[prev],
        ];
        if row.iter().any(|v| v.is_nan()) {
            return None;
        }
        let [rsi_now, _, line, signal, prev_line, prev_signal] = row;

        let rsi_label = IndicatorType::Rsi(self.params.rsi_period);
        let macd_label = IndicatorType::Macd {
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            signal: DEFAULT_SIGNAL,
        };

        if rsi_now < self.params.rsi_oversold && line > signal && prev_line <= prev_signal {
            return Some(
                Signal::buy(symbol, self.params.position_size).with_reason(format!(
                    "{rsi_label} oversold ({rsi_now:.2}) + {macd_label} crossover"
                )),
            );
        }

        if rsi_now > self.params.rsi_overbought && line < signal && prev_line >= prev_signal {
            return Some(
                Signal::sell(symbol, self.params.position_size).with_reason(format!(
                    "{rsi_label} overbought ({rsi_now:.2}) + {macd_label} crossunder"
                )),
            );
        }

        None
    }
}

impl Strategy for MomentumStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signal(
        &self,
        snapshot: &MarketSnapshot<'_>,
    ) -> Result<Option<Signal>, StrategyError> {
        for symbol in &self.symbols {
            let Some(view) = snapshot.get(symbol) else {
                continue;
            };
            if view.history.len() < MIN_HISTORY_BARS {
                continue;
            }

            let closes = checked_closes(symbol, view.history)?;
            if let Some(signal) = self.evaluate(symbol, &closes) {
                return Ok(Some(signal));
            }
        }
        Ok(None)
    }
}
