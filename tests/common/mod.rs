#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use quantops::domain::backtest::BacktestConfig;
use quantops::domain::error::{QuantopsError, StrategyError};
pub use quantops::domain::ohlcv::PriceBar;
use quantops::domain::replay::MarketSnapshot;
use quantops::domain::strategy::{Signal, Strategy};
use quantops::ports::data_port::DataPort;
use std::collections::{BTreeMap, HashMap};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<PriceBar>, QuantopsError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(QuantopsError::Data {
                reason: reason.clone(),
            });
        }
        let bars = self.data.get(symbol).ok_or_else(|| QuantopsError::NoData {
            symbol: symbol.to_string(),
        })?;
        Ok(bars
            .iter()
            .filter(|b| start.is_none_or(|s| b.timestamp >= s) && end.is_none_or(|e| b.timestamp <= e))
            .cloned()
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantopsError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, QuantopsError> {
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.timestamp).min().unwrap();
                let max = bars.iter().map(|b| b.timestamp).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

pub fn make_bar(timestamp: NaiveDateTime, close: f64) -> PriceBar {
    PriceBar {
        timestamp,
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 1_000.0,
    }
}

/// Hourly bars starting 2024-01-01 00:00, one per close.
pub fn hourly_bars(closes: &[f64]) -> Vec<PriceBar> {
    let start = ts(2024, 1, 1, 0);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(start + chrono::Duration::hours(i as i64), close))
        .collect()
}

/// 60 bars falling by 1 from 200 followed by a +3 bounce.
pub fn oversold_bounce_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
    closes.push(closes[59] + 3.0);
    closes
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        initial_capital: 100_000.0,
        commission_rate: 0.001,
        slippage_rate: 0.0005,
    }
}

/// Emits pre-programmed signals keyed by tick index of `clock_symbol`
/// (the number of its bars visible in the snapshot, minus one).
pub struct ScriptedStrategy {
    pub clock_symbol: String,
    pub script: BTreeMap<usize, Signal>,
}

impl ScriptedStrategy {
    pub fn new(clock_symbol: &str) -> Self {
        Self {
            clock_symbol: clock_symbol.to_string(),
            script: BTreeMap::new(),
        }
    }

    pub fn at(mut self, tick: usize, signal: Signal) -> Self {
        self.script.insert(tick, signal);
        self
    }
}

impl Strategy for ScriptedStrategy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate_signal(
        &self,
        snapshot: &MarketSnapshot<'_>,
    ) -> Result<Option<Signal>, StrategyError> {
        let Some(view) = snapshot.get(&self.clock_symbol) else {
            return Ok(None);
        };
        let tick = view.history.len() - 1;
        Ok(self.script.get(&tick).cloned())
    }
}
