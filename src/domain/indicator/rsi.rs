//! RSI (Relative Strength Index).
//!
//! Average gain and average loss are simple means over the trailing n price
//! changes (not Wilder-smoothed).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n values are NaN (n price changes are needed).

use super::{rolling, undefined};

pub fn calculate_rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < 2 {
        return undefined(data.len());
    }

    let mut gains = undefined(data.len());
    let mut losses = undefined(data.len());
    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        if change.is_nan() {
            continue;
        }
        gains[i] = change.max(0.0);
        losses[i] = (-change).max(0.0);
    }

    let mean = |w: &[f64]| w.iter().sum::<f64>() / period as f64;
    let avg_gain = rolling(&gains, period, mean);
    let avg_loss = rolling(&losses, period, mean);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&gain, &loss)| {
            if gain.is_nan() || loss.is_nan() {
                f64::NAN
            } else if loss == 0.0 {
                100.0
            } else {
                100.0 - (100.0 / (1.0 + gain / loss))
            }
        })
        .collect()
}
