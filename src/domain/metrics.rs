//! Performance metrics computed from an equity curve.

pub const TRADING_PERIODS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub total_return: f64,
    /// Annualized population std of per-tick returns.
    pub volatility: f64,
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline as a fraction; always ≤ 0.
    pub max_drawdown: f64,
}

impl Metrics {
    /// Curves with fewer than two points yield all-zero metrics.
    pub fn compute(equity_curve: &[f64]) -> Self {
        if equity_curve.len() < 2 {
            return Metrics::default();
        }

        let first = equity_curve[0];
        let last = equity_curve[equity_curve.len() - 1];
        let total_return = if first > 0.0 {
            (last - first) / first
        } else {
            0.0
        };

        let (volatility, sharpe_ratio) = compute_risk_adjusted(&period_returns(equity_curve));

        Metrics {
            total_return,
            volatility,
            sharpe_ratio,
            max_drawdown: compute_drawdown(equity_curve),
        }
    }
}

/// Simple per-tick returns; a non-positive previous value yields 0.
pub fn period_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            let (prev, curr) = (w[0], w[1]);
            if prev > 0.0 { (curr - prev) / prev } else { 0.0 }
        })
        .collect()
}

fn compute_drawdown(equity_curve: &[f64]) -> f64 {
    let Some(&first) = equity_curve.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        } else if peak > 0.0 {
            let dd = (equity - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Returns (annualized volatility, Sharpe ratio).
fn compute_risk_adjusted(returns: &[f64]) -> (f64, f64) {
    if returns.is_empty() {
        return (0.0, 0.0);
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let volatility = variance.sqrt() * TRADING_PERIODS_PER_YEAR.sqrt();

    let sharpe = if volatility > 0.0 {
        mean * TRADING_PERIODS_PER_YEAR / volatility
    } else {
        0.0
    };

    (volatility, sharpe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn metrics_empty_and_single_point() {
        assert_eq!(Metrics::compute(&[]), Metrics::default());
        assert_eq!(Metrics::compute(&[100_000.0]), Metrics::default());
    }

    #[test]
    fn metrics_total_return_positive() {
        let metrics = Metrics::compute(&[100_000.0, 110_000.0]);
        assert_relative_eq!(metrics.total_return, 0.10, epsilon = 1e-12);
    }

    #[test]
    fn metrics_total_return_negative() {
        let metrics = Metrics::compute(&[100_000.0, 90_000.0]);
        assert_relative_eq!(metrics.total_return, -0.10, epsilon = 1e-12);
    }

    #[test]
    fn metrics_total_return_zero_when_seed_not_positive() {
        let metrics = Metrics::compute(&[0.0, 10.0]);
        assert_eq!(metrics.total_return, 0.0);
    }

    #[test]
    fn metrics_max_drawdown() {
        let metrics = Metrics::compute(&[100_000.0, 110_000.0, 90_000.0, 95_000.0]);
        assert_relative_eq!(metrics.max_drawdown, -20_000.0 / 110_000.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.max_drawdown, -0.181818, epsilon = 1e-6);
    }

    #[test]
    fn metrics_max_drawdown_monotonic_rise_is_zero() {
        let metrics = Metrics::compute(&[100.0, 101.0, 105.0, 110.0]);
        assert_eq!(metrics.max_drawdown, 0.0);
    }

    #[test]
    fn metrics_flat_curve_has_no_risk() {
        let metrics = Metrics::compute(&[100.0; 10]);
        assert_eq!(metrics.volatility, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
        assert_eq!(metrics.max_drawdown, 0.0);
    }

    #[test]
    fn metrics_volatility_and_sharpe() {
        // returns +10%, -10%: mean 0, population std 0.1
        let metrics = Metrics::compute(&[100.0, 110.0, 99.0]);
        assert_relative_eq!(metrics.volatility, 0.1 * 252f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(metrics.sharpe_ratio, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn metrics_sharpe_positive_for_rising_noisy_curve() {
        let metrics = Metrics::compute(&[100.0, 102.0, 101.0, 104.0, 103.5, 107.0]);
        assert!(metrics.sharpe_ratio > 0.0);
        assert!(metrics.volatility > 0.0);
    }

    #[test]
    fn period_returns_guard_non_positive_prev() {
        assert_eq!(period_returns(&[0.0, 50.0, 100.0]), vec![0.0, 1.0]);
    }
}
