//! Fill simulation with slippage and commission.
//!
//! Rates are fractions: 0.001 is 0.1%. Buys pay a slippage premium and
//! sells receive a discount; commission is charged on the slipped notional.
//! No margin, no shorting and no partial fills: a fill that cannot be
//! covered in full is rejected and leaves the portfolio untouched.

use chrono::NaiveDateTime;
use std::fmt;

use super::portfolio::Portfolio;
use super::replay::MarketSnapshot;
use super::strategy::{Action, Signal};
use super::trade::Trade;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionConfig {
    pub commission_rate: f64,
    pub slippage_rate: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            commission_rate: 0.001,
            slippage_rate: 0.0005,
        }
    }
}

/// Commission on a traded notional.
pub fn calculate_commission(notional: f64, config: &ExecutionConfig) -> f64 {
    notional * config.commission_rate
}

/// Buyer pays more: price * (1 + slippage)
pub fn apply_slippage_buy(reference_price: f64, slippage_rate: f64) -> f64 {
    reference_price * (1.0 + slippage_rate)
}

/// Seller receives less: price * (1 - slippage)
pub fn apply_slippage_sell(reference_price: f64, slippage_rate: f64) -> f64 {
    reference_price * (1.0 - slippage_rate)
}

/// Why a signal was dropped instead of filled.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    NoMarketData,
    InvalidPrice { price: f64 },
    InsufficientCash { required: f64, available: f64 },
    InsufficientPosition { requested: f64, held: f64 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoMarketData => write!(f, "no market data"),
            RejectReason::InvalidPrice { price } => write!(f, "invalid reference price {price}"),
            RejectReason::InsufficientCash {
                required,
                available,
            } => write!(f, "insufficient cash: need {required:.4}, have {available:.4}"),
            RejectReason::InsufficientPosition { requested, held } => {
                write!(f, "insufficient position: sell {requested}, hold {held}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FillOutcome {
    Filled(Trade),
    Rejected(RejectReason),
}

/// Buy `amount` units at the slipped price if cash covers cost + commission.
pub fn execute_buy(
    portfolio: &mut Portfolio,
    symbol: &str,
    reference_price: f64,
    amount: f64,
    timestamp: NaiveDateTime,
    config: &ExecutionConfig,
) -> FillOutcome {
    if !reference_price.is_finite() {
        return FillOutcome::Rejected(RejectReason::InvalidPrice {
            price: reference_price,
        });
    }
    let execution_price = apply_slippage_buy(reference_price, config.slippage_rate);
    let cost = execution_price * amount;
    let commission = calculate_commission(cost, config);
    let total_cost = cost + commission;

    // NaN cost must not pass as affordable
    if total_cost.is_nan() || total_cost > portfolio.cash {
        return FillOutcome::Rejected(RejectReason::InsufficientCash {
            required: total_cost,
            available: portfolio.cash,
        });
    }

    portfolio.cash -= total_cost;
    portfolio.add_units(symbol, amount);

    let trade = Trade {
        timestamp,
        action: Action::Buy,
        symbol: symbol.to_string(),
        amount,
        price: execution_price,
        commission,
        value: total_cost,
    };
    portfolio.record_trade(trade.clone());
    FillOutcome::Filled(trade)
}

/// Sell `amount` units at the slipped price if at least that much is held.
pub fn execute_sell(
    portfolio: &mut Portfolio,
    symbol: &str,
    reference_price: f64,
    amount: f64,
    timestamp: NaiveDateTime,
    config: &ExecutionConfig,
) -> FillOutcome {
    if !reference_price.is_finite() {
        return FillOutcome::Rejected(RejectReason::InvalidPrice {
            price: reference_price,
        });
    }
    let held = portfolio.position(symbol);
    if !portfolio.has_position(symbol) || held < amount {
        return FillOutcome::Rejected(RejectReason::InsufficientPosition {
            requested: amount,
            held,
        });
    }

    let execution_price = apply_slippage_sell(reference_price, config.slippage_rate);
    let proceeds = execution_price * amount;
    let commission = calculate_commission(proceeds, config);
    let net_proceeds = proceeds - commission;

    portfolio.cash += net_proceeds;
    portfolio.remove_units(symbol, amount);

    let trade = Trade {
        timestamp,
        action: Action::Sell,
        symbol: symbol.to_string(),
        amount,
        price: execution_price,
        commission,
        value: net_proceeds,
    };
    portfolio.record_trade(trade.clone());
    FillOutcome::Filled(trade)
}

/// Fill a signal against the snapshot's reference (last) price.
pub fn execute_signal(
    portfolio: &mut Portfolio,
    signal: &Signal,
    snapshot: &MarketSnapshot<'_>,
    config: &ExecutionConfig,
) -> FillOutcome {
    let Some(price) = snapshot.last_price(&signal.symbol) else {
        return FillOutcome::Rejected(RejectReason::NoMarketData);
    };

    match signal.action {
        Action::Buy => execute_buy(
            portfolio,
            &signal.symbol,
            price,
            signal.amount,
            snapshot.timestamp,
            config,
        ),
        Action::Sell => execute_sell(
            portfolio,
            &signal.symbol,
            price,
            signal.amount,
            snapshot.timestamp,
            config,
        ),
    }
}
