//! Strategy contract and trading signals.
//!
//! A strategy inspects a [`MarketSnapshot`] and returns at most one
//! [`Signal`] per tick. Strategies take `&self` and keep no memory between
//! calls: everything they need must be recoverable from the snapshot's
//! history window, which keeps replays deterministic.

pub mod ma_crossover;
pub mod momentum;

pub use ma_crossover::{MaCrossoverParams, MaCrossoverStrategy};
pub use momentum::{MomentumParams, MomentumStrategy};

use crate::domain::error::StrategyError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::replay::MarketSnapshot;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Buy,
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "buy"),
            Action::Sell => write!(f, "sell"),
        }
    }
}

/// Strategy implementations selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Momentum,
    MaCrossover,
}

impl StrategyKind {
    pub const NAMES: [&'static str; 2] = ["momentum", "ma_crossover"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "momentum" => Some(StrategyKind::Momentum),
            "ma_crossover" => Some(StrategyKind::MaCrossover),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Momentum => write!(f, "momentum"),
            StrategyKind::MaCrossover => write!(f, "ma_crossover"),
        }
    }
}

/// A trading instruction produced by a strategy and consumed by the engine
/// in the same tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub action: Action,
    pub symbol: String,
    pub amount: f64,
    /// Informational only; fills always use the snapshot reference price.
    pub limit_price: Option<f64>,
    pub reason: String,
}

impl Signal {
    pub fn new(action: Action, symbol: impl Into<String>, amount: f64) -> Self {
        Signal {
            action,
            symbol: symbol.into(),
            amount,
            limit_price: None,
            reason: String::new(),
        }
    }

    pub fn buy(symbol: impl Into<String>, amount: f64) -> Self {
        Self::new(Action::Buy, symbol, amount)
    }

    pub fn sell(symbol: impl Into<String>, amount: f64) -> Self {
        Self::new(Action::Sell, symbol, amount)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_limit_price(mut self, price: f64) -> Self {
        self.limit_price = Some(price);
        self
    }

    /// Amount must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(StrategyError::InvalidSignal {
                reason: format!(
                    "{} {} has non-positive amount {}",
                    self.action, self.symbol, self.amount
                ),
            });
        }
        Ok(())
    }
}

pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` means no trade this tick, including when history is too
    /// short. `Err` means the snapshot could not be evaluated.
    fn generate_signal(
        &self,
        snapshot: &MarketSnapshot<'_>,
    ) -> Result<Option<Signal>, StrategyError>;
}

/// Close prices of a history window, rejecting non-finite values.
pub(crate) fn checked_closes(symbol: &str, history: &[PriceBar]) -> Result<Vec<f64>, StrategyError> {
    history
        .iter()
        .map(|bar| {
            if bar.close.is_finite() {
                Ok(bar.close)
            } else {
                Err(StrategyError::MalformedData {
                    symbol: symbol.to_string(),
                    reason: format!("non-finite close {} at {}", bar.close, bar.timestamp),
                })
            }
        })
        .collect()
}
