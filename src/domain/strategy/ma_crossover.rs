//! Moving average crossover strategy: golden cross buys, death cross sells.

use super::{checked_closes, Signal, Strategy};
use crate::domain::error::StrategyError;
use crate::domain::indicator::{calculate_sma, IndicatorType};
use crate::domain::replay::MarketSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct MaCrossoverParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub position_size: f64,
}

impl Default for MaCrossoverParams {
    fn default() -> Self {
        MaCrossoverParams {
            fast_period: 10,
            slow_period: 50,
            position_size: 0.1,
        }
    }
}

/// Same first-match rule as the momentum strategy: the first configured
/// symbol with a fresh cross wins the tick.
#[derive(Debug, Clone)]
pub struct MaCrossoverStrategy {
    name: String,
    symbols: Vec<String>,
    params: MaCrossoverParams,
}

impl MaCrossoverStrategy {
    pub fn new(name: impl Into<String>, symbols: Vec<String>, params: MaCrossoverParams) -> Self {
        Self {
            name: name.into(),
            symbols,
            params,
        }
    }

    /// Slow SMA needs a defined previous value to detect a cross.
    pub fn warmup_bars(&self) -> usize {
        self.params.slow_period + 1
    }

    fn evaluate(&self, symbol: &str, closes: &[f64]) -> Option<Signal> {
        let fast = calculate_sma(closes, self.params.fast_period);
        let slow = calculate_sma(closes, self.params.slow_period);
        let (last, prev) = (closes.len() - 1, closes.len() - 2);

        let (f, s, pf, ps) = (fast[last], slow[last], fast[prev], slow[prev]);
        if [f, s, pf, ps].iter().any(|v| v.is_nan()) {
            return None;
        }

        let fast_label = IndicatorType::Sma(self.params.fast_period);
        let slow_label = IndicatorType::Sma(self.params.slow_period);

        if f > s && pf <= ps {
            Some(
                Signal::buy(symbol, self.params.position_size)
                    .with_reason(format!("{fast_label} crossed above {slow_label}")),
            )
        } else if f < s && pf >= ps {
            Some(
                Signal::sell(symbol, self.params.position_size)
                    .with_reason(format!("{fast_label} crossed below {slow_label}")),
            )
        } else {
            None
        }
    }
}

impl Strategy for MaCrossoverStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signal(
        &self,
        snapshot: &MarketSnapshot<'_>,
    ) -> Result<Option<Signal>, StrategyError> {
        let warmup = self.warmup_bars().max(2);
        for symbol in &self.symbols {
            let Some(view) = snapshot.get(symbol) else {
                continue;
            };
            if view.history.len() < warmup {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::PriceBar;
    use crate::domain::replay::HistoricalData;
    use crate::domain::strategy::Action;
    use chrono::NaiveDate;

    fn bars_from(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: (start + chrono::Duration::days(i as i64))
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 10.0,
            })
            .collect()
    }

    fn strategy() -> MaCrossoverStrategy {
        MaCrossoverStrategy::new(
            "cross",
            vec!["AAA".into()],
            MaCrossoverParams {
                fast_period: 2,
                slow_period: 4,
                position_size: 1.0,
            },
        )
    }

    fn signal_at(closes: &[f64], index: usize) -> Option<Signal> {
        let data = HistoricalData::new().with_instrument("AAA", bars_from(closes));
        let cursor = data.primary_clock(None, None)[index];
        strategy().generate_signal(&data.snapshot_at(cursor)).unwrap()
    }

    #[test]
    fn golden_cross_buys() {
        // SMA(2) 6.5 → 8.0 crosses SMA(4) 7.0 → 7.25 at index 6
        let closes = [10.0, 9.0, 8.0, 7.0, 6.0, 7.0, 9.0, 12.0];
        let signal = signal_at(&closes, 6).expect("expected a buy");
        assert_eq!(signal.action, Action::Buy);
        assert_eq!(signal.amount, 1.0);
        assert_eq!(signal.reason, "SMA(2) crossed above SMA(4)");
        assert!(signal_at(&closes, 5).is_none());
        assert!(signal_at(&closes, 7).is_none());
    }

    #[test]
    fn death_cross_sells() {
        let closes = [6.0, 7.0, 8.0, 9.0, 10.0, 9.0, 7.0, 4.0];
        let signal = signal_at(&closes, 6).expect("expected a sell");
        assert_eq!(signal.action, Action::Sell);
    }

    #[test]
    fn warmup_returns_none() {
        let closes = [10.0, 9.0, 8.0, 12.0];
        assert!(signal_at(&closes, 3).is_none());
        assert_eq!(strategy().warmup_bars(), 5);
    }

    #[test]
    fn default_params() {
        let p = MaCrossoverParams::default();
        assert_eq!(p.fast_period, 10);
        assert_eq!(p.slow_period, 50);
    }
}
