//! Cash, holdings and equity tracking for a single run.

use chrono::NaiveDateTime;
use std::collections::BTreeMap;

use super::trade::Trade;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

/// Mutable accounting state owned by one engine.
///
/// Holdings are kept in a `BTreeMap` so valuation sums in symbol order and
/// repeated runs produce bit-identical equity. A symbol present in
/// `positions` always has quantity > 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub positions: BTreeMap<String, f64>,
    pub trades: Vec<Trade>,
    /// Seeded with `initial_capital`; one entry per processed tick after that.
    pub equity_curve: Vec<f64>,
    pub timestamps: Vec<NaiveDateTime>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            initial_capital,
            positions: BTreeMap::new(),
            trades: Vec::new(),
            equity_curve: vec![initial_capital],
            timestamps: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Portfolio::new(self.initial_capital);
    }

    pub fn position(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn has_position(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn add_units(&mut self, symbol: &str, amount: f64) {
        *self.positions.entry(symbol.to_string()).or_insert(0.0) += amount;
    }

    /// Removes units, dropping the entry once it reaches exactly zero.
    /// Callers must check the held quantity first.
    pub fn remove_units(&mut self, symbol: &str, amount: f64) {
        if let Some(held) = self.positions.get_mut(symbol) {
            *held -= amount;
            if *held == 0.0 {
                self.positions.remove(symbol);
            }
        }
    }

    pub fn record_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    pub fn record_tick(&mut self, timestamp: NaiveDateTime) {
        self.timestamps.push(timestamp);
    }

    pub fn record_equity(&mut self, equity: f64) {
        self.equity_curve.push(equity);
    }

    /// cash + Σ quantity × price. Symbols without a price contribute nothing.
    pub fn total_equity<F>(&self, price_of: F) -> f64
    where
        F: Fn(&str) -> Option<f64>,
    {
        let position_value: f64 = self
            .positions
            .iter()
            .filter_map(|(symbol, &qty)| price_of(symbol).map(|price| qty * price))
            .sum();
        self.cash + position_value
    }
}
