//! Backtest engine and event loop.
//!
//! Each tick of the primary instrument's clock:
//! 1. build the point-in-time snapshot
//! 2. ask the strategy for at most one signal
//! 3. simulate the fill (rejections are logged and dropped)
//! 4. record the timestamp and append cash + marked-to-market holdings
//!    to the equity curve
//!
//! Strategy errors abort the run. The portfolio then holds the ticks
//! completed before the failing one.

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use super::error::QuantopsError;
use super::execution::{execute_signal, ExecutionConfig, FillOutcome};
use super::metrics::Metrics;
use super::portfolio::{EquityPoint, Portfolio};
use super::replay::HistoricalData;
use super::strategy::Strategy;
use super::trade::Trade;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub commission_rate: f64,
    pub slippage_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 100_000.0,
            commission_rate: 0.001,
            slippage_rate: 0.0005,
        }
    }
}

impl BacktestConfig {
    pub fn execution(&self) -> ExecutionConfig {
        ExecutionConfig {
            commission_rate: self.commission_rate,
            slippage_rate: self.slippage_rate,
        }
    }
}

/// Optional inclusive bounds on the replay clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl RunWindow {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        RunWindow { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
}

/// Immutable summary of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub strategy_name: String,
    pub initial_capital: f64,
    pub final_value: f64,
    pub total_return: f64,
    pub total_return_pct: f64,
    pub trade_count: usize,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub equity_curve: Vec<f64>,
    pub timestamps: Vec<NaiveDateTime>,
    pub trades: Vec<Trade>,
}

impl BacktestResult {
    fn from_portfolio(strategy_name: &str, portfolio: &Portfolio) -> Self {
        let metrics = Metrics::compute(&portfolio.equity_curve);
        let final_value = portfolio
            .equity_curve
            .last()
            .copied()
            .unwrap_or(portfolio.initial_capital);

        BacktestResult {
            strategy_name: strategy_name.to_string(),
            initial_capital: portfolio.initial_capital,
            final_value,
            total_return: metrics.total_return,
            total_return_pct: metrics.total_return * 100.0,
            trade_count: portfolio.trades.len(),
            volatility: metrics.volatility,
            sharpe_ratio: metrics.sharpe_ratio,
            max_drawdown: metrics.max_drawdown,
            max_drawdown_pct: metrics.max_drawdown * 100.0,
            equity_curve: portfolio.equity_curve.clone(),
            timestamps: portfolio.timestamps.clone(),
            trades: portfolio.trades.clone(),
        }
    }

    /// Post-tick equity paired with its timestamp; the seed value is skipped.
    pub fn equity_points(&self) -> Vec<EquityPoint> {
        self.timestamps
            .iter()
            .zip(self.equity_curve.iter().skip(1))
            .map(|(&timestamp, &equity)| EquityPoint { timestamp, equity })
            .collect()
    }

    pub fn tick_count(&self) -> usize {
        self.timestamps.len()
    }
}

/// Sequential backtest engine. One instance owns the accounting state of
/// one run at a time; `run` takes `&mut self` so runs never overlap.
#[derive(Debug, Clone)]
pub struct Backtester {
    config: BacktestConfig,
    execution: ExecutionConfig,
    portfolio: Portfolio,
    state: EngineState,
}

impl Backtester {
    pub fn new(config: BacktestConfig) -> Self {
        Backtester {
            config,
            execution: config.execution(),
            portfolio: Portfolio::new(config.initial_capital),
            state: EngineState::Idle,
        }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn reset(&mut self) {
        self.portfolio.reset();
        self.state = EngineState::Idle;
    }

    /// Replays `data` from a fresh state and returns the run summary.
    pub fn run(
        &mut self,
        strategy: &dyn Strategy,
        data: &HistoricalData,
        window: RunWindow,
    ) -> Result<BacktestResult, QuantopsError> {
        self.reset();
        let clock = data.primary_clock(window.start, window.end);
        info!(
            strategy = strategy.name(),
            primary = data.primary().map(|p| p.symbol.as_str()).unwrap_or("<none>"),
            ticks = clock.len(),
            initial_capital = self.config.initial_capital,
            "starting backtest"
        );

        self.state = EngineState::Running;
        let replayed = clock
            .iter()
            .try_for_each(|&timestamp| self.step(strategy, data, timestamp));
        self.state = EngineState::Idle;
        replayed?;

        let result = BacktestResult::from_portfolio(strategy.name(), &self.portfolio);
        info!(
            final_value = result.final_value,
            total_return_pct = result.total_return_pct,
            trades = result.trade_count,
            "backtest completed"
        );
        Ok(result)
    }

    fn step(
        &mut self,
        strategy: &dyn Strategy,
        data: &HistoricalData,
        timestamp: NaiveDateTime,
    ) -> Result<(), QuantopsError> {
        let snapshot = data.snapshot_at(timestamp);

        if let Some(signal) = strategy.generate_signal(&snapshot)? {
            signal.validate()?;
            match execute_signal(&mut self.portfolio, &signal, &snapshot, &self.execution) {
                FillOutcome::Filled(trade) => debug!(
                    %timestamp,
                    action = %trade.action,
                    symbol = %trade.symbol,
                    amount = trade.amount,
                    price = trade.price,
                    cash = self.portfolio.cash,
                    "fill executed"
                ),
                FillOutcome::Rejected(reason) => warn!(
                    %timestamp,
                    action = %signal.action,
                    symbol = %signal.symbol,
                    amount = signal.amount,
                    %reason,
                    "fill rejected"
                ),
            }
        }

        let equity = self
            .portfolio
            .total_equity(|symbol| snapshot.last_price(symbol));
        self.portfolio.record_tick(timestamp);
        self.portfolio.record_equity(equity);
        Ok(())
    }
}
