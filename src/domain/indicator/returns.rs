//! Period returns and rolling volatility.

use super::stddev::population_stddev;
use super::{rolling, undefined};

/// Percent change from the previous value. The first element is NaN, as is
/// any element whose previous value is zero.
pub fn calculate_returns(data: &[f64]) -> Vec<f64> {
    let mut out = undefined(data.len());
    for i in 1..data.len() {
        let prev = data[i - 1];
        if prev != 0.0 {
            out[i] = (data[i] - prev) / prev;
        }
    }
    out
}

/// Trailing population standard deviation of a returns series.
pub fn rolling_volatility(returns: &[f64], period: usize) -> Vec<f64> {
    rolling(returns, period, population_stddev)
}
