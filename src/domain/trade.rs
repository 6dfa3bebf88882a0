//! Executed fill records.

use crate::domain::strategy::Action;
use chrono::NaiveDateTime;

/// One executed fill. Append-only in the trade log.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub timestamp: NaiveDateTime,
    pub action: Action,
    pub symbol: String,
    pub amount: f64,
    /// Price after slippage.
    pub price: f64,
    pub commission: f64,
    /// Total cost including commission for buys, net proceeds for sells.
    pub value: f64,
}

impl Trade {
    /// Signed effect on cash: negative for buys, positive for sells.
    pub fn cash_flow(&self) -> f64 {
        match self.action {
            Action::Buy => -self.value,
            Action::Sell => self.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trade(action: Action) -> Trade {
        Trade {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            action,
            symbol: "BTC/USDT".into(),
            amount: 0.1,
            price: 50_025.0,
            commission: 5.0025,
            value: 5_007.5025,
        }
    }

    #[test]
    fn buy_cash_flow_is_negative() {
        assert!((trade(Action::Buy).cash_flow() + 5_007.5025).abs() < 1e-9);
    }

    #[test]
    fn sell_cash_flow_is_positive() {
        assert!((trade(Action::Sell).cash_flow() - 5_007.5025).abs() < 1e-9);
    }
}
